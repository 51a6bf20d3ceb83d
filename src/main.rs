use minesweeper_ai::{Agent, Board, Minefield};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let field = Minefield::new(concat!(
        "....*...\n",
        "........\n",
        "*.....*.\n",
        "........\n",
        "...*....\n",
        "........\n",
        ".*....*.\n",
        "........\n",
    ))
    .expect("demo board is well formed");
    let size = field.size();
    let mut agent = Agent::seeded(size.height, size.width, 2024);

    while let Some(cell) = agent.next_move() {
        if field.is_mine(cell) {
            warn!(%cell, "hit a mine");
            break;
        }
        let count = field.nearby_mines(cell);
        info!(%cell, count, "played");
        if let Err(err) = agent.add_knowledge(cell, count) {
            warn!(%err, "observation rejected");
            break;
        }
        if field.won(agent.knowledge().mines()) {
            info!("all mines found");
            break;
        }
    }
    println!("Mines found: {}", agent.knowledge().mines().len());
    println!("Board:\n{field}");
}
