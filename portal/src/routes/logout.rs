use actix_session::Session;
use actix_web::HttpResponse;
use tracing::info;

use crate::auth::session::sign_out;
use crate::routes::{LOGIN_PATH, see_other};

pub async fn logout(session: Session) -> HttpResponse {
    sign_out(&session);
    info!("Signed out");
    see_other(LOGIN_PATH)
}
