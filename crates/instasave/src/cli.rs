use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "instasave")]
#[command(author, version, about = "Resolve public Instagram post URLs into direct media URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a post URL and print the direct media URL
    Resolve {
        /// Post, reel or TV URL
        url: String,

        /// Print the JSON response instead of plain text
        #[arg(long)]
        json: bool,

        /// Give up after this many seconds in total
        #[arg(short, long)]
        deadline: Option<u64>,

        /// List every fetch attempt on stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the request profiles in the order they are tried
    Profiles,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["instasave", "resolve", "https://www.instagram.com/p/ABC/", "--json", "-d", "20"])
            .unwrap();
        match cli.command {
            Commands::Resolve {
                url,
                json,
                deadline,
                verbose,
            } => {
                assert_eq!(url, "https://www.instagram.com/p/ABC/");
                assert!(json);
                assert_eq!(deadline, Some(20));
                assert!(!verbose);
            }
            Commands::Profiles => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_resolve_requires_url() {
        assert!(Cli::try_parse_from(["instasave", "resolve"]).is_err());
    }
}
