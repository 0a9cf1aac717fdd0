use clap::Parser;
use saferoute::cli::{
    analyze, handle_completions, handle_config_init, knowledge, table, Cli, Commands,
    ConfigCommands, KnowledgeCommands, TableCommands,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn print_output(result: CliResult<String>) -> CliResult<()> {
    let output = result?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => saferoute::cli::serve::run_serve(args).await,
        Commands::Analyze(args) => print_output(analyze::handle_analyze(&args).await),
        Commands::Poll(args) => print_output(analyze::handle_poll(&args).await),
        Commands::Table(table_cmd) => match table_cmd {
            TableCommands::Create(args) => print_output(table::handle_table_create(&args).await),
        },
        Commands::Knowledge(knowledge_cmd) => match knowledge_cmd {
            KnowledgeCommands::Upload(args) => {
                print_output(knowledge::handle_knowledge_upload(&args).await)
            }
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => print_output(handle_config_init(&args)),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
