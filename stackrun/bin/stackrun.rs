use std::{process::ExitCode, sync::Arc};

use clap::{CommandFactory, Parser};
use stackrun::{
    cli::{styles::AnsiStyles, DevArgs, StackrunArgs, StackrunSubcommand},
    config::{default_container_name, resolve_project_dir, DevOptions, VERIFY_CONTAINER_NAME},
    management::{container, dev, verify},
    runtime::{ContainerRuntime, DevOutcome, DockerCli},
    StackrunResult,
};
use tracing_subscriber::{fmt, EnvFilter};

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let args = StackrunArgs::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // The only place stackrun decides its exit status.
    match dispatch(args).await {
        Ok(DevOutcome::Completed) => ExitCode::SUCCESS,
        Ok(DevOutcome::Interrupted) => {
            tracing::info!("interrupted, container stopped");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{} {}", "error:".error(), e);
            ExitCode::FAILURE
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

async fn dispatch(args: StackrunArgs) -> StackrunResult<DevOutcome> {
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(DockerCli::new());
    let dry_run = args.dry_run;

    match args.subcommand {
        Some(StackrunSubcommand::Run { args }) => run_dev("run", args, dry_run, runtime).await,
        Some(StackrunSubcommand::Debug { args }) => run_dev("debug", args, dry_run, runtime).await,
        Some(StackrunSubcommand::Test { args }) => run_dev("test", args, dry_run, runtime).await,
        Some(StackrunSubcommand::Stop { name, project_dir }) => {
            let name = match name {
                Some(name) => name,
                None => default_container_name(resolve_project_dir(project_dir)?)?,
            };

            container::stop(runtime.as_ref(), &name).await?;
            println!("stopped {}", name.literal());
            Ok(DevOutcome::Completed)
        }
        Some(StackrunSubcommand::Ps) => {
            print!("{}", container::ps(runtime.as_ref()).await?);
            Ok(DevOutcome::Completed)
        }
        Some(StackrunSubcommand::Verify { project_dir }) => {
            let project_dir = resolve_project_dir(project_dir)?;
            verify::run(&project_dir, runtime, &verify::ExecutableLauncher::default()).await?;
            println!(
                "{} {} started",
                "ok:".valid(),
                VERIFY_CONTAINER_NAME.literal()
            );
            Ok(DevOutcome::Completed)
        }
        None => {
            StackrunArgs::command().print_help()?;
            Ok(DevOutcome::Completed)
        }
    }
}

async fn run_dev(
    mode: &str,
    args: DevArgs,
    dry_run: bool,
    runtime: Arc<dyn ContainerRuntime>,
) -> StackrunResult<DevOutcome> {
    tracing::trace!("running dev container: mode={mode}, args={args:?}");
    let options = DevOptions::from_args(args, dry_run)?;
    dev::run(mode, &options, runtime).await
}
