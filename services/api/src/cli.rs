use crate::demo::{run_demo, run_room_import, DemoArgs, RoomImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hostel_admin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hostel Management System",
    about = "Run and administer the hostel management back office from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP admin service (default command)
    Serve(ServeArgs),
    /// Manage the room inventory
    Rooms {
        #[command(subcommand)]
        command: RoomsCommand,
    },
    /// Run an end-to-end walkthrough of a hostel term against an in-memory store
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RoomsCommand {
    /// Import rooms from a CSV export into the configured store
    Import(RoomImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rooms {
            command: RoomsCommand::Import(args),
        } => run_room_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["hostel-admin-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rooms_import_requires_a_csv_path() {
        let cli = Cli::try_parse_from(["hostel-admin-api", "rooms", "import", "--csv", "rooms.csv"])
            .expect("parses");
        match cli.command {
            Some(Command::Rooms {
                command: RoomsCommand::Import(args),
            }) => assert_eq!(args.csv, std::path::PathBuf::from("rooms.csv")),
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["hostel-admin-api", "rooms", "import"]).is_err());
    }
}
