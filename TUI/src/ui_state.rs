#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Dashboard,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Chat => Tab::Dashboard,
            Tab::Dashboard => Tab::Chat,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Dashboard => "Dashboard",
        }
    }
}

#[derive(Default)]
pub struct UIState {
    pub tab: Tab,
    pub input: String,
    pub scroll_offset: usize,
    pub status_message: Option<String>,

    // Command popup state
    pub command_selection: Option<usize>,

    // Ctrl+P completion: typed prefix and index of the last candidate inserted
    pub completion: Option<(String, usize)>,

    // Send animation state (ticks remaining)
    pub send_animation: u8,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }
}
