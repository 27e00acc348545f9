use gymbook::backend::db::{Database, DatabaseHealth, SqlParam};
use gymbook::backend::server::Settings;
use sqlx::Row;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    println!("🔍 DEBUGGING DATABASE CONNECTION");
    println!("================================");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            println!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db_settings = &settings.database;
    println!("Environment: {}", settings.server.environment);
    println!("Target: {}", db_settings.redacted_target());
    println!(
        "From DATABASE_URL: {}",
        if db_settings.url.is_some() { "yes" } else { "no" }
    );
    println!("SSL: {}", db_settings.ssl);
    println!(
        "Pool: max {} connections, idle timeout {:?}, connect timeout {:?}",
        db_settings.max_connections, db_settings.idle_timeout, db_settings.connect_timeout
    );

    let db = Database::connect(db_settings, true);

    println!("\n🧪 Running health check...");
    let code = match db.check_health().await {
        DatabaseHealth::Reachable { server_time } => {
            println!("✅ Database reachable! Server time: {}", server_time);

            println!("\n📋 Checking if 'users' table exists...");
            match db
                .query(
                    "SELECT count(*) AS tables FROM information_schema.tables WHERE table_name = $1",
                    &[SqlParam::from("users")],
                )
                .await
            {
                Ok(result) => {
                    let count: i64 = result
                        .first()
                        .and_then(|row| row.try_get("tables").ok())
                        .unwrap_or(0);
                    if count > 0 {
                        println!("✅ Users table exists!");
                    } else {
                        println!("⚠️  Users table does not exist - start the server once to run migrations");
                    }
                }
                Err(e) => println!("❌ Error checking users table: {}", e),
            }
            0
        }
        DatabaseHealth::Unreachable { error } => {
            println!("❌ Database unreachable: {}", error);
            1
        }
    };

    db.shutdown().await;
    std::process::exit(code);
}
