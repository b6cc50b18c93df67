#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    activity_board::run().await
}
