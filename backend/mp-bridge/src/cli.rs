use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mp-bridge")]
#[command(about = "Puppet identity registry for Meta bridges")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Validate config, prepare the database and restore bound puppets
    Check,

    /// Print the puppet identity of a remote account
    FormatId { remote_id: i64 },

    /// Print the remote account behind a puppet identity
    ParseId { identity: String },

    /// Print the stored record of a puppet
    Show { remote_id: i64 },

    /// Push a profile snapshot to a puppet
    Sync {
        remote_id: i64,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        display_name: Option<String>,

        /// Remote avatar URL, pass an empty string to remove the avatar
        #[arg(long)]
        avatar_url: Option<String>,
    },

    /// Link a local user to a puppet
    Bind {
        remote_id: i64,
        identity: String,

        #[arg(long)]
        access_token: Option<String>,
    },

    /// Remove a puppet's linked local user
    Unbind { remote_id: i64 },
}
