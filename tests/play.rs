use std::collections::HashSet;

use minesweeper_ai::{Agent, Board, Cell, KnowledgeError, Minefield};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Play `start`, then keep playing proven-safe cells until none are left.
fn play_safe_only(field: &Minefield, start: Cell, seed: u64) -> Agent {
    let size = field.size();
    let mut agent = Agent::seeded(size.height, size.width, seed);
    agent.add_knowledge(start, field.nearby_mines(start)).unwrap();
    while let Some(cell) = agent.make_safe_move() {
        assert!(!field.is_mine(cell), "safe move {cell} is a mine");
        agent.add_knowledge(cell, field.nearby_mines(cell)).unwrap();
    }
    agent
}

fn random_field(height: usize, width: usize, mines: usize, rng: &mut SmallRng) -> Minefield {
    let mut layout = vec!['.'; height * width];
    layout[..mines].fill('*');
    layout.shuffle(rng);
    let encoded = layout
        .chunks(width)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");
    Minefield::new(&encoded).unwrap()
}

#[test]
fn cascade_from_open_corner() {
    let field = Minefield::new(
        "
        ....*
        .....
        .....
        ",
    )
    .unwrap();
    for seed in 0..5 {
        let agent = play_safe_only(&field, Cell::new(2, 0), seed);
        let knowledge = agent.knowledge();
        assert_eq!(knowledge.mines(), field.mines());
        assert_eq!(knowledge.moves_made().len(), 14);
        assert!(field.won(knowledge.mines()));
    }
}

#[test]
fn one_two_one_needs_resolution() {
    let field = Minefield::new(
        "
        *.*
        ...
        ...
        ",
    )
    .unwrap();
    for seed in 0..5 {
        let agent = play_safe_only(&field, Cell::new(2, 1), seed);
        let knowledge = agent.knowledge();
        assert_eq!(knowledge.mines(), field.mines());
        assert!(knowledge.moves_made().contains(&Cell::new(0, 1)));
        assert!(knowledge.sentences().is_empty());
    }
}

#[test]
fn deductions_are_sound_on_random_fields() {
    let mut rng = SmallRng::seed_from_u64(17);
    for game in 0..40 {
        let field = random_field(8, 8, 10, &mut rng);
        let mut agent = Agent::seeded(8, 8, game);
        let mut safes_seen = HashSet::new();
        let mut mines_seen = HashSet::new();
        while let Some(cell) = agent.next_move() {
            if field.is_mine(cell) {
                // only a random move may hit a mine
                assert!(!agent.knowledge().safes().contains(&cell));
                break;
            }
            agent.add_knowledge(cell, field.nearby_mines(cell)).unwrap();

            let knowledge = agent.knowledge();
            assert!(knowledge.mines().is_subset(field.mines()));
            assert!(knowledge.safes().is_disjoint(field.mines()));
            assert!(safes_seen.is_subset(knowledge.safes()));
            assert!(mines_seen.is_subset(knowledge.mines()));
            for sentence in knowledge.sentences() {
                assert!(sentence.count() <= sentence.len());
                let actual = sentence.cells().iter().filter(|&&c| field.is_mine(c)).count();
                assert_eq!(actual, sentence.count(), "false sentence {sentence}");
            }
            safes_seen = knowledge.safes().clone();
            mines_seen = knowledge.mines().clone();
        }
    }
}

#[test]
fn lying_board_is_rejected() {
    let field = Minefield::new(
        "
        *..
        ...
        ...
        ",
    )
    .unwrap();
    let mut agent = Agent::seeded(3, 3, 5);
    agent.add_knowledge(Cell::new(2, 2), 0).unwrap();
    agent
        .add_knowledge(Cell::new(1, 1), field.nearby_mines(Cell::new(1, 1)))
        .unwrap();
    let before = agent.knowledge().clone();
    // (1, 2) sees no mine, so claiming two contradicts (1, 1)
    assert!(matches!(
        agent.add_knowledge(Cell::new(1, 2), 2),
        Err(KnowledgeError::Contradiction(_)),
    ));
    assert_eq!(agent.knowledge(), &before);
    assert!(matches!(
        agent.add_knowledge(Cell::new(3, 0), 0),
        Err(KnowledgeError::OutOfBounds { .. }),
    ));
    assert_eq!(agent.knowledge(), &before);
}
