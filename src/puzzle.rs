use crate::board::{ALL_MOVES, BLANK, Board, CELLS, COLS, Move, ROWS};
use arrayvec::ArrayVec;
use rand::Rng;

/// Transition model for one search: a fixed goal configuration plus the
/// scratch board the solver mutates while expanding nodes.
pub struct Puzzle {
    goal: Board,
    state: Board,
    // goal_index[label] = row-major cell index of `label` in the goal board
    goal_index: [u8; 256],
}

impl Puzzle {
    /// Build the model. Fails if the two boards are not permutations of the
    /// same label multiset, since the heuristic and the move model assume
    /// exact label correspondence.
    pub fn new(goal: Board, initial: Board) -> Result<Self, String> {
        for label in initial.tiles() {
            if !goal.contains(label) {
                return Err(format!(
                    "label {} on the initial board is missing from the goal board",
                    label
                ));
            }
        }

        let mut goal_index = [0u8; 256];
        for (idx, label) in goal.tiles().enumerate() {
            goal_index[label as usize] = idx as u8;
        }

        Ok(Puzzle {
            goal,
            state: initial,
            goal_index,
        })
    }

    /// Replace the current board with a copy of `board`.
    pub fn set_state(&mut self, board: &Board) {
        self.state = board.clone();
    }

    /// The current board. Callers clone before carrying the value across a
    /// boundary that will later mutate this model.
    pub fn state(&self) -> &Board {
        &self.state
    }

    /// Legal moves for the blank in its current position: the subset of
    /// directions that keep it inside the grid, in the fixed [`ALL_MOVES`]
    /// order.
    pub fn legal_moves(&self) -> ArrayVec<Move, 4> {
        let (row, col) = self.state.blank_pos();
        let mut moves = ArrayVec::new();
        for mv in ALL_MOVES {
            if Self::target(row, col, mv).is_some() {
                moves.push(mv);
            }
        }
        moves
    }

    /// Swap the blank with its neighbor in the given direction. Callers must
    /// only pass a currently-legal move.
    pub fn slide(&mut self, mv: Move) {
        let (row, col) = self.state.blank_pos();
        let target = Self::target(row, col, mv);
        debug_assert!(target.is_some(), "illegal move {} from {:?}", mv, (row, col));
        if let Some(target) = target {
            self.state.swap((row, col), target);
        }
    }

    fn target(row: usize, col: usize, mv: Move) -> Option<(usize, usize)> {
        let (dr, dc) = mv.delta();
        let row = row as i8 + dr;
        let col = col as i8 + dc;
        if row >= 0 && row < ROWS as i8 && col >= 0 && col < COLS as i8 {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }

    /// Sum of Manhattan distances from every misplaced non-blank tile to its
    /// goal cell.
    pub fn heuristic(&self) -> u32 {
        let mut h = 0u32;
        for (idx, label) in self.state.tiles().enumerate() {
            if label == BLANK {
                continue;
            }
            let goal_idx = self.goal_index[label as usize] as usize;
            if idx != goal_idx {
                h += (idx / COLS).abs_diff(goal_idx / COLS) as u32;
                h += (idx % COLS).abs_diff(goal_idx % COLS) as u32;
            }
        }
        h
    }

    /// True iff the current board is cell-wise equal to the goal.
    pub fn is_goal(&self) -> bool {
        self.state == self.goal
    }

    /// Reachability test. A configuration is reachable from the goal iff the
    /// parity of the permutation taking current cells to goal cells (blank
    /// included) matches the parity of the blank's Manhattan displacement:
    /// every blank move is one transposition and one unit of blank travel,
    /// so the two parities stay in lockstep.
    pub fn is_solvable(&self) -> bool {
        let mut perm = [0usize; CELLS];
        for (idx, label) in self.state.tiles().enumerate() {
            perm[idx] = self.goal_index[label as usize] as usize;
        }

        // Permutation parity via cycle decomposition: a cycle of length L
        // factors into L - 1 transpositions.
        let mut seen = [false; CELLS];
        let mut transpositions = 0;
        for start in 0..CELLS {
            if seen[start] {
                continue;
            }
            let mut len = 0;
            let mut at = start;
            while !seen[at] {
                seen[at] = true;
                at = perm[at];
                len += 1;
            }
            transpositions += len - 1;
        }

        let (row, col) = self.state.blank_pos();
        let goal_blank = self.goal_index[BLANK as usize] as usize;
        let blank_dist = row.abs_diff(goal_blank / COLS) + col.abs_diff(goal_blank % COLS);

        transpositions % 2 == blank_dist % 2
    }

    /// Random-walk the blank `steps` legal moves, never immediately undoing
    /// the previous move. Starting from the goal this yields an instance
    /// that is solvable by construction.
    pub fn scramble<R: Rng>(&mut self, steps: usize, rng: &mut R) {
        let mut last: Option<Move> = None;
        for _ in 0..steps {
            let moves: ArrayVec<Move, 4> = self
                .legal_moves()
                .into_iter()
                .filter(|&mv| last.is_none_or(|prev| mv != prev.opposite()))
                .collect();
            let mv = moves[rng.gen_range(0..moves.len())];
            self.slide(mv);
            last = Some(mv);
        }
    }
}
