use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "payroll-admin")]
#[command(about = "Administrator console for the payroll and benefits backend")]
pub struct CliConfig {
    /// Path to TOML configuration file; falls back to SUPABASE_* env vars when missing
    #[arg(short, long, default_value = "payroll-admin.toml")]
    pub config: String,

    /// Administrator email
    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: Option<String>,

    /// Administrator password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show dashboard statistics
    Stats,

    /// Import employees from a CSV file
    Import {
        file: PathBuf,

        /// Write failed records to this CSV file
        #[arg(long)]
        error_report: Option<String>,

        /// Override the pause between records (milliseconds)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Do not print per-record progress
        #[arg(short, long)]
        quiet: bool,
    },

    /// Recalculate benefits for every employee
    Recalculate,

    /// Ask the Apps Script deployment to rebuild the sheet view
    RefreshSheet,
}

impl CliConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() => {
                Some((email.trim(), password))
            }
            _ => None,
        }
    }
}
