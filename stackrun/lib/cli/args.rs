use std::path::PathBuf;

use clap::{Args, Parser};

use super::styles;

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// stackrun - Run a project's stack in a local development container
#[derive(Debug, Parser)]
#[command(name = "stackrun", author, about, version, styles = styles::styles())]
pub struct StackrunArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<StackrunSubcommand>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the container command without running it
    #[arg(long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands
#[derive(Debug, Parser)]
pub enum StackrunSubcommand {
    /// Run the project in a development container
    #[command(name = "run")]
    Run {
        /// Container options
        #[command(flatten)]
        args: DevArgs,
    },

    /// Run the project in debug mode
    #[command(name = "debug")]
    Debug {
        /// Container options
        #[command(flatten)]
        args: DevArgs,
    },

    /// Run the project's tests in a container
    #[command(name = "test")]
    Test {
        /// Container options
        #[command(flatten)]
        args: DevArgs,
    },

    /// Stop the project's development container
    #[command(name = "stop")]
    Stop {
        /// Name of the container. Defaults to the project's development container
        #[arg(long)]
        name: Option<String>,

        /// Project directory. Defaults to the current directory
        #[arg(long, value_name = "PATH")]
        project_dir: Option<PathBuf>,
    },

    /// List running containers
    #[command(name = "ps")]
    Ps,

    /// Check that the project's container starts
    #[command(name = "verify")]
    Verify {
        /// Project directory. Defaults to the current directory
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: Option<PathBuf>,
    },
}

/// Options shared by `run`, `debug` and `test`.
#[derive(Debug, Clone, Default, Args)]
pub struct DevArgs {
    /// Network for the container to join
    #[arg(long)]
    pub network: Option<String>,

    /// Name of the container
    #[arg(long)]
    pub name: Option<String>,

    /// Volume caching the stack's dependencies
    #[arg(long)]
    pub deps_volume: Option<String>,

    /// Publish a container port to the host, may be repeated
    #[arg(short = 'p', long, value_name = "HOST:CONTAINER")]
    pub publish: Vec<String>,

    /// Publish every exposed port to a random host port
    #[arg(short = 'P', long)]
    pub publish_all: bool,

    /// Project directory. Defaults to the current directory
    #[arg(long, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,
}

//-------------------------------------------------------------------------------------------------
// Tests
//-------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        StackrunArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_ports() {
        let args = StackrunArgs::parse_from([
            "stackrun",
            "--dry-run",
            "run",
            "-p",
            "3001:3000",
            "--publish",
            "9229:9229",
            "-P",
            "--network",
            "dev-net",
        ]);

        assert!(args.dry_run);
        assert!(!args.verbose);
        let Some(StackrunSubcommand::Run { args: dev }) = args.subcommand else {
            panic!("expected the run subcommand");
        };
        assert_eq!(dev.publish, vec!["3001:3000", "9229:9229"]);
        assert!(dev.publish_all);
        assert_eq!(dev.network.as_deref(), Some("dev-net"));
        assert_eq!(dev.name, None);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = StackrunArgs::parse_from(["stackrun", "debug", "--name", "api", "-v"]);

        assert!(args.verbose);
        let Some(StackrunSubcommand::Debug { args: dev }) = args.subcommand else {
            panic!("expected the debug subcommand");
        };
        assert_eq!(dev.name.as_deref(), Some("api"));
    }

    #[test]
    fn test_non_dev_subcommands() {
        let args = StackrunArgs::parse_from(["stackrun", "verify", "/work/my-app"]);
        match args.subcommand {
            Some(StackrunSubcommand::Verify { project_dir }) => {
                assert_eq!(project_dir, Some(PathBuf::from("/work/my-app")));
            }
            other => panic!("unexpected subcommand: {:?}", other),
        }

        assert!(StackrunArgs::try_parse_from(["stackrun", "ps", "--name", "x"]).is_err());
    }
}
