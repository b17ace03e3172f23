use std::fmt::{Display, Formatter};

/// Navigable pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Overview,
    Sensors,
    Aviaries,
    Devices,
    Batches,
    People,
    Actuators,
    Readings,
}

impl Page {
    /// In navigation order.
    pub const ALL: [Page; 8] = [
        Page::Overview,
        Page::Sensors,
        Page::Aviaries,
        Page::Devices,
        Page::Batches,
        Page::People,
        Page::Actuators,
        Page::Readings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Dashboard",
            Page::Sensors => "Sensors",
            Page::Aviaries => "Aviaries",
            Page::Devices => "Devices",
            Page::Batches => "Batches",
            Page::People => "People",
            Page::Actuators => "Actuators",
            Page::Readings => "Readings",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Page::Overview => "/dashboard",
            Page::Sensors => "/dashboard/sensor",
            Page::Aviaries => "/dashboard/aviario",
            Page::Devices => "/dashboard/dispositivo",
            Page::Batches => "/dashboard/lote",
            Page::People => "/dashboard/pessoa",
            Page::Actuators => "/dashboard/atuador",
            Page::Readings => "/dashboard/leitura",
        }
    }

    /// Ignores a trailing slash.
    pub fn from_route(route: &str) -> Option<Page> {
        let route = match route.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Page::ALL.into_iter().find(|page| page.route() == route)
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
