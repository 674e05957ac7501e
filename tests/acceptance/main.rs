use cucumber::World;
use wiremock::MockServer;

#[derive(Default, World)]
pub struct WeeklogWorld {
    pub server: Option<MockServer>,
    pub captured_output: Vec<u8>,
    pub run_result: Option<Result<(), anyhow::Error>>,
}

impl std::fmt::Debug for WeeklogWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeeklogWorld")
            .field("server", &self.server.as_ref().map(MockServer::uri))
            .field(
                "captured_output",
                &String::from_utf8_lossy(&self.captured_output),
            )
            .field("run_result", &self.run_result)
            .finish()
    }
}

#[tokio::main]
async fn main() {
    WeeklogWorld::run("features").await;
}

mod steps;
