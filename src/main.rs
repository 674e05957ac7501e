use tokio_util::sync::CancellationToken;
use weeklog::api::RequestContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    weeklog::logging::init();

    let interrupt = CancellationToken::new();
    let ctx = RequestContext::from_token(interrupt.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let args: Vec<String> = std::env::args().collect();
    weeklog::run::run(args, None, &ctx, None).await
}
