use space_invaders::leaderboard::server;

#[tokio::main]
async fn main() {
    server::run().await;
}
