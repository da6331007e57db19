use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "namechain")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "createchain", about = "Create a new chain with a genesis block")]
    Createchain {
        #[arg(help = "The address to send the genesis reward to")]
        address: String,
    },
    #[command(name = "getname", about = "Look up the address a name points to")]
    GetName {
        #[arg(help = "The name to look up")]
        name: String,
    },
    #[command(name = "listnames", about = "Print every registered name")]
    ListNames,
    #[command(name = "namecost", about = "Minimum value needed to register a name")]
    NameCost {
        #[arg(help = "The name to price")]
        name: String,
    },
    #[command(
        name = "encodename",
        about = "Build the output script registering NAME for ADDRESS"
    )]
    EncodeName {
        #[arg(help = "The name to register")]
        name: String,
        #[arg(help = "Recipient address")]
        address: String,
    },
    #[command(name = "decodescript", about = "Decode a hex output script")]
    DecodeScript {
        #[arg(help = "Script bytes in hex")]
        script: String,
    },
    #[command(name = "printchain", about = "Print all blocks in the chain")]
    Printchain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_getname_with_config() {
        let opt = Opt::parse_from(["namechain", "getname", "my-cool-name", "--config", "n.toml"]);
        assert_eq!(opt.config, Some(PathBuf::from("n.toml")));
        match opt.command {
            Command::GetName { name } => assert_eq!(name, "my-cool-name"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_encodename_needs_address() {
        assert!(Opt::try_parse_from(["namechain", "encodename", "foo"]).is_err());
    }
}
