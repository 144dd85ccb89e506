#[derive(Debug, Clone)]
pub enum MenuAction {
    IngestLeads,
    ShowTierStats,
    SelectGroup,
    DispatchVerify,
    DispatchCall,
    DispatchEmail,
    DispatchExport,
    RecommendTimeSlots,
    ShowCredits,
    ShowHistory,
    StartApiServer,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::IngestLeads => write!(f, "📥 Ingest leads from the configured source"),
            MenuAction::ShowTierStats => write!(f, "📊 Show tier statistics"),
            MenuAction::SelectGroup => write!(f, "🎯 Select a lead group"),
            MenuAction::DispatchVerify => write!(f, "🤖 AI-verify selected leads (1 credit each)"),
            MenuAction::DispatchCall => write!(f, "📞 Queue calls for selected leads"),
            MenuAction::DispatchEmail => write!(f, "📧 Send email campaign to selected leads"),
            MenuAction::DispatchExport => write!(f, "📤 Export selected leads to JSON"),
            MenuAction::RecommendTimeSlots => write!(f, "⏰ Recommend email send times"),
            MenuAction::ShowCredits => write!(f, "💳 Show credit balance / top up"),
            MenuAction::ShowHistory => write!(f, "📜 Show dispatch history"),
            MenuAction::StartApiServer => write!(f, "🌐 Start the API server"),
            MenuAction::Exit => write!(f, "👋 Exit"),
        }
    }
}
