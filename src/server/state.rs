use crate::cultures::CultureRegistry;
use crate::diet::DietRules;
use crate::settings;

#[derive(Clone)]
pub(crate) struct ServerState {
    pub(crate) settings: settings::Settings,
    pub(crate) cultures: CultureRegistry,
    pub(crate) rules: DietRules,
}
