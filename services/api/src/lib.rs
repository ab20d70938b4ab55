mod cli;
mod infra;
mod routes;
mod screen;
mod server;

use talent_screen::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
