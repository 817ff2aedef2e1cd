use std::time::Duration;

use credsign_aliyun_rsa_key_pair::{Config, RsaKeyPairCredential, Runtime};
use credsign_core::{Context, OsEnv, Result};
use credsign_file_read_tokio::TokioFileRead;
use credsign_spawn_tokio::TokioSpawn;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_env(OsEnv)
        .with_spawn(TokioSpawn);

    // Reads ALIBABA_CLOUD_PUBLIC_KEY_ID and ALIBABA_CLOUD_PRIVATE_KEY(_FILE).
    let config = Config::default().from_env(&ctx);
    let runtime = Runtime::default()
        .with_connect_timeout(Duration::from_secs(5))
        .with_read_timeout(Duration::from_secs(10));

    let cred = match RsaKeyPairCredential::from_config(ctx, &config, Some(&runtime)).await {
        Ok(cred) => cred,
        Err(err) => {
            eprintln!("invalid config: {err}");
            eprintln!("set ALIBABA_CLOUD_PUBLIC_KEY_ID and ALIBABA_CLOUD_PRIVATE_KEY_FILE first");
            return Ok(());
        }
    };

    let snapshot = cred.credential().await?;
    println!("credential type: {}", snapshot.r#type);
    println!("access key id: {}", snapshot.access_key_id);

    // Served from cache until it's about to expire.
    let again = cred.access_key_id().await?;
    println!("cached access key id matches: {}", again == snapshot.access_key_id);

    Ok(())
}
