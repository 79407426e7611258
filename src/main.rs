use ltfs_cmd::cli::{Cli, Commands};
use ltfs_cmd::commands::{self, mappings::MapRequest, Context};
use ltfs_cmd::error::Result;
use ltfs_cmd::{logger, service, system, tape, JsonMappingStore};
use tracing::{debug, error, info};

fn main() {
    let args = Cli::parse_args();

    // Initialize logging system
    if let Err(e) = logger::init(args.verbose, args.log_json) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("ltfscmd starting");

    match run(args) {
        Ok(_) => {
            info!("Operation completed successfully");
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Cli) -> Result<()> {
    let config = commands::prepare(system::is_elevated(), args.config.as_deref())?;

    let tapes = tape::platform_system()?;
    let service = service::platform_service(&config)?;
    let mut store = JsonMappingStore::new(config.mapping_file());
    debug!("Mapping store: {}", store.path().display());

    let mut ctx = Context {
        config: &config,
        tapes: tapes.as_ref(),
        mappings: &mut store,
        service: service.as_ref(),
    };

    match args.command {
        Commands::ListDrives { json } => commands::drives::list_drives(&ctx, json),

        Commands::ListMappings => commands::mappings::list_mappings(&ctx),

        Commands::Map {
            drive,
            tape,
            all_online,
            log_dir,
            work_dir,
        } => commands::mappings::map_drive(
            &mut ctx,
            MapRequest {
                drive,
                tape,
                show_offline: config.show_offline && !all_online,
                log_dir,
                work_dir,
            },
        ),

        Commands::Unmap { drive } => commands::mappings::unmap_drive(&mut ctx, drive),

        Commands::Remap => commands::mappings::remap_drives(&mut ctx).map(|_| ()),

        Commands::Start => commands::service::start_service(&ctx),

        Commands::Stop => commands::service::stop_service(&ctx),

        Commands::Load { drive } => commands::media::load_drive(&ctx, drive, true),

        Commands::LoadOnly { drive } => commands::media::load_drive(&ctx, drive, false),

        Commands::Mount { drive } => commands::media::mount_drive(&ctx, drive),

        Commands::Eject { drive } => commands::media::eject_drive(&ctx, drive),
    }
}
