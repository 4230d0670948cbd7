//! Configuration: settings file and the container template registry

pub mod settings;
pub mod templates;

pub use settings::Settings;
pub use templates::ContainerTemplate;
