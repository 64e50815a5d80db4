use std::io::{self, BufRead, IsTerminal, Read, Write};

use anyhow::Result;
use clap::Parser;
use tamil_dialect_translator::{
    Config, Dialect, Gemini, Panel, Phase, Session, build_translator, format_panel,
};

#[derive(Parser, Debug)]
#[command(
    name = "tamil-dialect-translator",
    version,
    about = "Translate English sentences into regional Tamil dialects"
)]
struct Cli {
    /// English sentence to translate (reads stdin when omitted)
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Tamil dialect: Chennai, Kanyakumari or Coimbatore
    #[arg(short = 'd', long = "dialect")]
    dialect: Option<String>,

    /// Gemini model name (overrides settings)
    #[arg(short = 'm', long = "model")]
    model: Option<String>,

    /// API key (overrides GEMINI_API_KEY / GOOGLE_API_KEY)
    #[arg(short = 'k', long = "key")]
    key: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Serve the web form (address defaults to settings [server] address)
    #[arg(long = "serve", num_args = 0..=1, default_missing_value = "")]
    serve: Option<String>,

    /// Show the selectable dialects and exit
    #[arg(long = "show-dialects")]
    show_dialects: bool,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,

    /// Interactive mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            dialect: self.dialect.clone(),
            model: self.model.clone(),
            key: self.key.clone(),
            settings_path: self.read_settings.clone(),
            show_dialects: self.show_dialects,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tamil_dialect_translator::logging::init(cli.verbose)?;
    let config = cli.config();

    if let Some(addr) = cli.serve.clone() {
        return tamil_dialect_translator::serve(config, Some(addr)).await;
    }
    if cli.interactive {
        return run_interactive(&config).await;
    }

    let input = if cli.show_dialects {
        None
    } else if let Some(text) = cli.text.clone() {
        Some(text)
    } else if io::stdin().is_terminal() {
        None
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer.trim_end_matches(['\r', '\n']).to_string())
    };

    let output = tamil_dialect_translator::run(config, input).await?;
    println!("{}", output);
    Ok(())
}

async fn run_interactive(config: &Config) -> Result<()> {
    let (translator, _) = build_translator(config)?;
    let mut session = Session::new(translator);
    if let Some(dialect) = Dialect::parse_selection(config.dialect.as_deref())? {
        session.select_dialect(Some(dialect));
    }

    println!("Interactive mode. Use /quit or /exit to finish.");
    println!("Type /help to see available commands.");

    let mut line = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    loop {
        line.clear();
        print!("> ");
        io::stdout().flush()?;
        if stdin_lock.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            continue;
        }
        if input.trim_start().starts_with('/') {
            if handle_interactive_command(input.trim(), &mut session).await? {
                break;
            }
            continue;
        }

        session.set_text(input);
        if session.form().dialect.is_some() {
            print_phase(session.submit().await);
        } else {
            println!("sentence set; choose a dialect with /dialect <name>");
        }
    }
    Ok(())
}

async fn handle_interactive_command(
    input: &str,
    session: &mut Session<Gemini>,
) -> Result<bool> {
    if matches!(input, "/quit" | "/exit") {
        return Ok(true);
    }
    if input == "/help" {
        print_interactive_help();
        return Ok(false);
    }
    if input == "/dialects" {
        println!("{}", Dialect::labels().join("\n"));
        return Ok(false);
    }
    if input == "/translate" {
        print_phase(session.submit().await);
        return Ok(false);
    }
    if input == "/clear" {
        session.set_text("");
        session.select_dialect(None);
        println!("form cleared");
        return Ok(false);
    }
    if let Some(arg) = input.strip_prefix("/dialect") {
        let value = arg.trim();
        if value.is_empty() {
            println!(
                "dialect: {}",
                session
                    .form()
                    .dialect
                    .map(|dialect| dialect.as_str())
                    .unwrap_or("(none)")
            );
            return Ok(false);
        }
        match value.parse::<Dialect>() {
            Ok(dialect) => {
                session.select_dialect(Some(dialect));
                println!("dialect set to {}", dialect);
            }
            Err(err) => eprintln!("{}", err),
        }
        return Ok(false);
    }

    eprintln!("unknown command: {}", input);
    Ok(false)
}

fn print_phase(phase: &Phase) {
    match phase {
        Phase::Warning(message) => eprintln!("{}", message),
        Phase::Displaying(panel @ Panel::Translated { .. }) => println!("{}", format_panel(panel)),
        Phase::Displaying(panel @ Panel::Failed { .. }) => eprintln!("{}", format_panel(panel)),
        Phase::Idle | Phase::Validating | Phase::Translating => {}
    }
}

fn print_interactive_help() {
    println!("Commands:");
    println!("  <sentence>                   Set the English sentence and translate it");
    println!("  /dialect <name>              Select a dialect (or show current)");
    println!("  /dialects                    Show selectable dialects");
    println!("  /translate                   Translate the current sentence again");
    println!("  /clear                       Clear the sentence and dialect");
    println!("  /quit, /exit                 Exit interactive mode");
}

