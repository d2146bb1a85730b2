use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

use clap::Parser;

const MIGRATIONS: diesel_async_migrations::EmbeddedMigrations =
    diesel_async_migrations::embed_migrations!("../migrations/");

async fn run_migrations(connection: &mut diesel_async::AsyncPgConnection) {
    MIGRATIONS.run_pending_migrations(connection).await.unwrap();
}

#[derive(Debug, Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Remove a file, or a whole match with everything hanging off it
    Remove {
        #[arg(long)]
        file_id: Option<i32>,
        #[arg(long)]
        match_id: Option<i32>,
    },
    /// Delete stored recs that no file row references anymore
    Gc {
        /// Local rec folder; when omitted the bucket from the S3_* env vars
        /// is used instead
        #[arg(long)]
        store_folder: Option<std::path::PathBuf>,
    },
}

fn storage_from(
    store_folder: Option<std::path::PathBuf>,
) -> Box<dyn backend::storage::RecStorage> {
    match store_folder {
        Some(folder) => Box::new(backend::storage::FileStorage::new(folder)),
        None => {
            let bucket = std::env::var("S3_BUCKET").expect("'S3_BUCKET' must be set");
            let region = s3::Region::Custom {
                region: std::env::var("S3_REGION").expect("'S3_REGION' must be set"),
                endpoint: std::env::var("S3_ENDPOINT").expect("'S3_ENDPOINT' must be set"),
            };
            let credentials = s3::creds::Credentials::default().unwrap();

            Box::new(backend::storage::S3Storage::new(&bucket, region, credentials).unwrap())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    let args = Args::parse();

    tracing::info!("Applying Migrations");
    let mut conn = backend::db_connection().await;
    run_migrations(&mut conn).await;
    tracing::info!("Completed Migrations");

    match args.command {
        Command::Remove { file_id, match_id } => {
            match backend::api::remove(&mut conn, file_id, match_id).await {
                Ok(outcome) => tracing::info!("{:?}", outcome),
                Err(error) => tracing::error!("removing: {:?}", error),
            }
        }
        Command::Gc { store_folder } => {
            let storage = storage_from(store_folder);
            match backend::gc::run_gc(storage.as_ref(), &mut conn).await {
                Ok(removed) => tracing::info!("removed {} orphaned recs", removed),
                Err(error) => tracing::error!("garbage collecting: {:?}", error),
            }
        }
    }
}
