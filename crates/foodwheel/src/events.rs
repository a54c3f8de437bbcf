use spinwheel::{CatalogOrigin, ControlCommand, RecipeCatalog};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Spin,
    /// Config file and catalog both.
    Reload,
    ConfigReload,
    CatalogLoaded(Box<RecipeCatalog>, CatalogOrigin),
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Spin => AppEvent::Spin,
            ControlCommand::Show => AppEvent::Show,
            ControlCommand::Hide => AppEvent::Hide,
            ControlCommand::Reload => AppEvent::Reload,
        }
    }
}
