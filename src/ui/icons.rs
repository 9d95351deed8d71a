pub struct Icons;

impl Icons {
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const IDEA: &str = "💡";
    pub const TASK: &str = "☑️";
    pub const NOTE: &str = "📝";
    pub const FOLDER: &str = "📁";
    pub const PIN: &str = "📌";
    pub const DATABASE: &str = "🗄️";
    pub const CALENDAR: &str = "📅";
    pub const VIDEO: &str = "📺";
    pub const HEART: &str = "❤️";
    pub const EMPTY_HEART: &str = "🤍";
    pub const DEL: &str = "🗑️";
}

impl Icons {
    /// Icon shown next to an item of the given type
    pub fn for_item(item_type: crate::ItemType) -> &'static str {
        match item_type {
            crate::ItemType::Project => Self::FOLDER,
            crate::ItemType::Idea => Self::IDEA,
            crate::ItemType::Task => Self::TASK,
            crate::ItemType::Link => Self::LINK,
            crate::ItemType::Note => Self::NOTE,
        }
    }
}
