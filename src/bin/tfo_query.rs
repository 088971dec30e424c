use clap::{Parser, ValueEnum};
use talent_flow::core::agents::UserRole;
use talent_flow::utils::error::{ErrorSeverity, Result};
use talent_flow::utils::logger::{self, LogFormat};
use talent_flow::{app_state_from_config, AppState, CliConfig, ConfigProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// LLM agent orchestrator with rule fallbacks
    Agents,
    /// Keyword chatbot only
    Rules,
    /// Two-agent conversational workflow
    Chat,
}

#[derive(Parser)]
#[command(name = "tfo-query")]
#[command(about = "Run a single talent query and print the JSON response")]
struct Args {
    /// The question to ask
    query: String,

    #[arg(long, value_enum, default_value = "agents")]
    mode: Mode,

    /// EMPLOYEE, CONSULTANT, MANAGER, TSC_CONSULTANT or anything else for OTHER
    #[arg(long, default_value = "EMPLOYEE")]
    role: String,

    #[arg(long)]
    employee_id: Option<String>,

    /// Conversation thread for chat mode
    #[arg(long, default_value = "cli")]
    thread_id: String,

    #[command(flatten)]
    settings: CliConfig,
}

async fn run(args: &Args, state: &AppState) -> Result<serde_json::Value> {
    let value = match args.mode {
        Mode::Agents => {
            let role: UserRole = args.role.parse()?;
            let response = state
                .orchestrator
                .process_query(role, &args.query, args.employee_id.as_deref())
                .await?;
            serde_json::to_value(response)?
        }
        Mode::Rules => {
            let role: UserRole = args.role.parse()?;
            match (&args.employee_id, role.is_manager_side()) {
                (Some(id), false) => {
                    serde_json::to_value(state.chatbot.process_employee_query(id, &args.query)?)?
                }
                _ => serde_json::to_value(
                    state.chatbot.process_manager_query(&args.role, &args.query),
                )?,
            }
        }
        Mode::Chat => serde_json::to_value(
            state.workflow.invoke(&args.thread_id, &args.query).await?,
        )?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let resolved = args.settings.resolve();
    let format = match &resolved {
        Ok(config) => config.log_format(),
        Err(_) => LogFormat::from_json_flag(args.settings.json_logs),
    };
    logger::init_logger(format, args.settings.verbose);

    let outcome = async {
        let config = resolved?;
        let state = app_state_from_config(&config)?;
        run(&args, &state).await
    }
    .await;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Query failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
