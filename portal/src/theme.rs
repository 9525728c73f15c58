use models::Theme;
use tokio::sync::watch;
use tracing::info;

/// Site-wide theme. The one place the default theme lives; readers either
/// sample it with [`ThemeState::current`] or subscribe to changes.
pub struct ThemeState {
    sender: watch::Sender<Theme>,
}

impl ThemeState {
    pub fn new(default: Theme) -> Self {
        let (sender, _) = watch::channel(default);
        Self { sender }
    }

    pub fn current(&self) -> Theme {
        *self.sender.borrow()
    }

    /// Replaces the site default. Subscribers are only woken when the value
    /// actually changes.
    pub fn set(&self, theme: Theme) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == theme {
                false
            } else {
                *current = theme;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.sender.subscribe()
    }

    /// A visitor's preference wins over the site default.
    pub fn resolve(&self, preference: Option<Theme>) -> Theme {
        preference.unwrap_or_else(|| self.current())
    }
}

/// Logs every change of the site theme until the state is dropped.
pub async fn log_theme_changes(mut receiver: watch::Receiver<Theme>) {
    while receiver.changed().await.is_ok() {
        let theme = *receiver.borrow_and_update();
        info!(%theme, "Site theme changed");
    }
}
