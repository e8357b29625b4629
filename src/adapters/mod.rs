// Adapters layer: concrete implementations for external systems (Supabase, Apps Script, console).

pub mod apps_script;
pub mod notifier;
pub mod supabase;

pub use apps_script::AppsScriptClient;
pub use notifier::{ConsoleNotifier, MemoryNotifier};
pub use supabase::SupabaseClient;
