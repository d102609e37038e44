use crate::board::{Board, Move};
use crate::pqueue::PriorityQueue;
use crate::puzzle::Puzzle;
use std::collections::HashMap;

/// One configuration reached during search. Immutable once constructed:
/// `f` is fixed at `g + w*h` when the node is built and never recomputed.
#[derive(Debug, Clone)]
pub struct Node {
    pub board: Board,
    /// Move that produced this node from its parent; `None` for the root.
    pub mv: Option<Move>,
    /// Path cost: number of moves from the root.
    pub g: u32,
    /// Heuristic estimate for this node's board.
    pub h: u32,
    /// Evaluation value ordering the frontier.
    pub f: f64,
    parent: Option<usize>,
}

impl Node {
    fn new(
        parent: Option<usize>,
        board: Board,
        mv: Option<Move>,
        g: u32,
        h: u32,
        weight: f64,
    ) -> Self {
        let f = g as f64 + weight * h as f64;
        Node {
            board,
            mv,
            g,
            h,
            f,
            parent,
        }
    }
}

#[derive(Debug)]
pub enum SolveResult {
    /// Root-to-goal path of configurations differing by one blank swap each.
    Solved(Vec<Node>),
    /// The expansion budget ran out before a goal node was popped.
    Cutoff,
    /// No move sequence connects the initial board to the goal.
    Unsolvable,
}

pub struct Solver {
    weight: f64,
    max_nodes: usize,
    generated: usize,
    expanded: usize,
}

impl Solver {
    pub fn new(weight: f64, max_nodes: usize) -> Self {
        Solver {
            weight,
            max_nodes,
            generated: 0,
            expanded: 0,
        }
    }

    /// Nodes pushed onto the frontier so far, not counting the root.
    pub fn nodes_generated(&self) -> usize {
        self.generated
    }

    /// Nodes popped from the frontier and expanded so far.
    pub fn nodes_expanded(&self) -> usize {
        self.expanded
    }

    /// Weighted-A* best-first search from `puzzle`'s current board.
    ///
    /// The frontier orders nodes by `f = g + w*h` alone, FIFO among equal
    /// values. A board already recorded in the visited table is re-expanded
    /// only when it resurfaces with a strictly smaller `f`: with `w > 1` the
    /// weighted heuristic is not admissible, and reopening is what lets a
    /// cheaper late path displace an earlier expansion.
    pub fn solve(&mut self, puzzle: &mut Puzzle) -> SolveResult {
        if !puzzle.is_solvable() {
            return SolveResult::Unsolvable;
        }

        let mut arena: Vec<Node> = Vec::new();
        let mut frontier = PriorityQueue::new();
        let mut visited: HashMap<Board, f64> = HashMap::new();

        let root = Node::new(
            None,
            puzzle.state().clone(),
            None,
            0,
            puzzle.heuristic(),
            self.weight,
        );
        frontier.push(root.f, 0);
        arena.push(root);

        while let Some(id) = frontier.pop_min() {
            match visited.get(&arena[id].board) {
                Some(&best) if best <= arena[id].f => continue,
                _ => {
                    visited.insert(arena[id].board.clone(), arena[id].f);
                }
            }

            let parent_board = arena[id].board.clone();
            puzzle.set_state(&parent_board);

            if puzzle.is_goal() {
                return SolveResult::Solved(reconstruct_path(&arena, id));
            }

            if self.expanded >= self.max_nodes {
                return SolveResult::Cutoff;
            }
            self.expanded += 1;

            let g = arena[id].g + 1;
            for mv in puzzle.legal_moves() {
                puzzle.slide(mv);
                let child = Node::new(
                    Some(id),
                    puzzle.state().clone(),
                    Some(mv),
                    g,
                    puzzle.heuristic(),
                    self.weight,
                );
                frontier.push(child.f, arena.len());
                arena.push(child);
                self.generated += 1;
                // Siblings expand from the same parent state, not cumulatively.
                puzzle.set_state(&parent_board);
            }
        }

        // A solvable instance always pops its goal before the frontier
        // empties; this is the backstop for state spaces exhausted without
        // reaching the goal.
        SolveResult::Unsolvable
    }
}

/// Walk parent links back to the root, then reverse into root-first order.
fn reconstruct_path(arena: &[Node], goal_id: usize) -> Vec<Node> {
    let mut path = Vec::new();
    let mut at = Some(goal_id);
    while let Some(id) = at {
        path.push(arena[id].clone());
        at = arena[id].parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle_for(initial: Board) -> Puzzle {
        Puzzle::new(Board::canonical(), initial).unwrap()
    }

    fn assert_valid_path(path: &[Node], initial: &Board, goal: &Board) {
        assert_eq!(&path[0].board, initial);
        assert_eq!(&path.last().unwrap().board, goal);
        assert!(path[0].mv.is_none());
        assert_eq!(path[0].g, 0);

        let mut replay = Puzzle::new(goal.clone(), initial.clone()).unwrap();
        for (step, node) in path.iter().enumerate().skip(1) {
            let mv = node.mv.expect("non-root nodes record their move");
            assert!(replay.legal_moves().contains(&mv));
            replay.slide(mv);
            assert_eq!(replay.state(), &node.board);
            assert_eq!(node.g, step as u32);
        }
    }

    #[test]
    fn test_already_solved() {
        let mut puzzle = puzzle_for(Board::canonical());
        let mut solver = Solver::new(1.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_eq!(path.len(), 1);
                assert_eq!(solver.nodes_generated(), 0);
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_single_move_instance() {
        // Canonical goal with 11 and 0 swapped: one blank move to solve.
        let initial = Board::from_text("1 2 3 4\n5 6 7 8\n9 10 0 11").unwrap();
        let mut puzzle = puzzle_for(initial.clone());
        let mut solver = Solver::new(1.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_eq!(path.len(), 2);
                assert_eq!(path[1].mv, Some(Move::Right));
                assert!(solver.nodes_generated() <= 4);
                assert_valid_path(&path, &initial, &Board::canonical());
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_two_move_instance_counts() {
        let initial = Board::from_text("1 2 3 4\n5 6 7 8\n9 0 10 11").unwrap();
        let mut puzzle = puzzle_for(initial.clone());
        let mut solver = Solver::new(1.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_eq!(path.len(), 3);
                assert_eq!(path[1].mv, Some(Move::Right));
                assert_eq!(path[2].mv, Some(Move::Right));
                assert_valid_path(&path, &initial, &Board::canonical());
                // Root and the one on-path child; the goal pop returns
                // before expanding.
                assert_eq!(solver.nodes_expanded(), 2);
                assert_eq!(solver.nodes_generated(), 6);
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_f_invariant_across_weights() {
        for weight in [0.0, 1.0, 2.5] {
            let initial = Board::from_text("1 2 3 4\n5 6 7 8\n9 0 10 11").unwrap();
            let mut puzzle = puzzle_for(initial);
            let mut solver = Solver::new(weight, usize::MAX);

            match solver.solve(&mut puzzle) {
                SolveResult::Solved(path) => {
                    for node in &path {
                        assert_eq!(node.f, node.g as f64 + weight * node.h as f64);
                    }
                }
                other => panic!("expected solved, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_weight_degrades_to_uniform_cost() {
        // With w = 0 the search orders by g alone; the first goal pop is
        // still depth-optimal, and revisits of the start state are
        // suppressed rather than re-expanded.
        let initial = Board::from_text("1 2 3 4\n5 6 7 8\n9 0 10 11").unwrap();
        let mut puzzle = puzzle_for(initial.clone());
        let mut solver = Solver::new(0.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_eq!(path.len(), 3);
                assert_valid_path(&path, &initial, &Board::canonical());
                // Nine distinct non-goal boards pop before the goal; the
                // duplicates generated alongside them pop as dominated and
                // never expand.
                assert_eq!(solver.nodes_expanded(), 9);
                assert_eq!(solver.nodes_generated(), 29);
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_four_move_instance_is_depth_optimal() {
        let mut setup = puzzle_for(Board::canonical());
        for mv in [Move::Left, Move::Up, Move::Left, Move::Up] {
            setup.slide(mv);
        }
        let initial = setup.state().clone();

        let mut puzzle = puzzle_for(initial.clone());
        let mut solver = Solver::new(1.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_eq!(path.len(), 5);
                assert_valid_path(&path, &initial, &Board::canonical());
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_inflated_weight_still_solves() {
        let mut setup = puzzle_for(Board::canonical());
        for mv in [
            Move::Left,
            Move::Left,
            Move::Up,
            Move::Left,
            Move::Up,
            Move::Right,
        ] {
            setup.slide(mv);
        }
        let initial = setup.state().clone();

        let mut puzzle = puzzle_for(initial.clone());
        let mut solver = Solver::new(5.0, usize::MAX);

        match solver.solve(&mut puzzle) {
            SolveResult::Solved(path) => {
                assert_valid_path(&path, &initial, &Board::canonical());
            }
            other => panic!("expected solved, got {:?}", other),
        }
    }

    #[test]
    fn test_unsolvable_instance() {
        let initial = Board::from_text("2 1 3 4\n5 6 7 8\n9 10 11 0").unwrap();
        let mut puzzle = puzzle_for(initial);
        let mut solver = Solver::new(1.0, usize::MAX);

        assert!(matches!(
            solver.solve(&mut puzzle),
            SolveResult::Unsolvable
        ));
        assert_eq!(solver.nodes_generated(), 0);
    }

    #[test]
    fn test_expansion_budget_cutoff() {
        let initial = Board::from_text("1 2 3 4\n5 6 7 8\n9 0 10 11").unwrap();
        let mut puzzle = puzzle_for(initial);
        let mut solver = Solver::new(1.0, 1);

        assert!(matches!(solver.solve(&mut puzzle), SolveResult::Cutoff));
    }
}
