use portal::{Application, PortalSettings, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_subscriber();
    let settings = PortalSettings::get_configuration()?;

    let app = Application::build(settings).await?;
    app.run_until_stopped().await?;

    Ok(())
}
