use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plstats::{analysis::DEFAULT_TOP_N, api::MAX_TOP_N, cli, config, error, init_tracing};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API and store the user token
    Auth,

    /// Rank the top contributors, artists and genres of a playlist
    Analyze(AnalyzeArgs),

    /// Serve the analysis over HTTP
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Playlist id, spotify:playlist: URI or open.spotify.com link
    pub playlist: String,

    /// Use an app token (client credentials) instead of the stored user token
    #[clap(long)]
    pub app_token: bool,

    /// Print the JSON result instead of tables
    #[clap(long)]
    pub json: bool,

    /// Number of entries per ranking, at most 10
    #[clap(long, default_value_t = DEFAULT_TOP_N, value_parser = parse_top)]
    pub top: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_top(raw: &str) -> Result<usize, String> {
    let top: usize = raw.parse().map_err(|_| format!("{} is not a number", raw))?;
    if (1..=MAX_TOP_N).contains(&top) {
        Ok(top)
    } else {
        Err(format!("must be between 1 and {}", MAX_TOP_N))
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            init_tracing("plstats=warn");
            cli::auth().await
        }
        Command::Analyze(opt) => {
            init_tracing("plstats=warn");
            cli::analyze(cli::AnalyzeOptions {
                playlist: opt.playlist,
                app_token: opt.app_token,
                json: opt.json,
                top: opt.top,
            })
            .await
        }
        Command::Serve => {
            init_tracing("plstats=info");
            cli::serve().await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_accepts_one_to_ten() {
        assert_eq!(parse_top("1"), Ok(1));
        assert_eq!(parse_top("10"), Ok(10));
    }

    #[test]
    fn top_rejects_values_past_ten() {
        assert!(parse_top("0").is_err());
        assert!(parse_top("11").is_err());
        assert!(parse_top("50").is_err());
        assert!(parse_top("abc").is_err());
    }
}
