//! Search tree nodes.
//!
//! A child holds an [`Rc`] to its parent and nothing points downwards, so a
//! node lives exactly as long as a frontier, a closed set or a descendant
//! still refers to it. The move path is rebuilt from the parent chain only
//! when a result is reported.

use rand::{seq::SliceRandom, Rng};
use std::rc::Rc;

use crate::puzzle::{Move, State};

#[derive(Debug)]
pub struct SearchNode {
    state: State,
    parent: Option<Rc<SearchNode>>,
    depth: usize,
    g: usize,
    h: usize,
    f: usize,
}

impl SearchNode {
    pub fn root(state: State) -> Self {
        Self {
            state,
            parent: None,
            depth: 0,
            g: 0,
            h: 0,
            f: 0,
        }
    }

    /// Child reached from `parent` by one unit-cost slide. `h` starts at zero.
    pub fn child(parent: &Rc<SearchNode>, state: State) -> Self {
        let g = parent.g + 1;
        Self {
            state,
            parent: Some(Rc::clone(parent)),
            depth: parent.depth + 1,
            g,
            h: 0,
            f: g,
        }
    }

    /// Sets the heuristic estimate and recomputes `f = g + h`.
    pub fn with_estimate(mut self, h: usize) -> Self {
        self.h = h;
        self.f = self.g + h;
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode>> {
        self.parent.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Path cost from the root.
    pub fn g(&self) -> usize {
        self.g
    }

    /// Heuristic estimate to the goal, zero outside A*.
    pub fn h(&self) -> usize {
        self.h
    }

    pub fn f(&self) -> usize {
        self.f
    }

    pub fn is_goal(&self, goal: &State) -> bool {
        self.state == *goal
    }

    fn ancestors(&self) -> impl Iterator<Item = &SearchNode> {
        std::iter::successors(self.parent.as_deref(), |node| node.parent.as_deref())
    }

    /// Whether this node's state already appears further up its own path.
    pub fn revisits_ancestor(&self) -> bool {
        self.ancestors().any(|ancestor| ancestor.state == self.state)
    }

    /// Slides from the root to this node.
    pub fn path(&self) -> Vec<Move> {
        let mut path: Vec<Move> = std::iter::once(self)
            .chain(self.ancestors())
            .filter_map(|node| node.state.move_taken())
            .collect();
        path.reverse();
        path
    }

    /// One child per legal slide, shuffled with `rng`.
    pub fn generate_children<R: Rng + ?Sized>(self: &Rc<Self>, rng: &mut R) -> Vec<SearchNode> {
        let mut children: Vec<SearchNode> = self
            .state
            .possible_moves()
            .into_iter()
            .map(|state| SearchNode::child(self, state))
            .collect();
        children.shuffle(rng);
        children
    }
}

// Long parent chains would otherwise be dropped recursively.
impl Drop for SearchNode {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            parent = match Rc::try_unwrap(node) {
                Ok(mut node) => node.parent.take(),
                Err(_) => None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn state(text: &str) -> State {
        text.parse().unwrap()
    }

    #[test]
    fn root_has_no_path() {
        let root = SearchNode::root(state("_ 1 / 2 3"));
        assert_eq!(root.depth(), 0);
        assert_eq!(root.f(), 0);
        assert!(root.path().is_empty());
        assert!(root.parent().is_none());
    }

    #[test]
    fn children_extend_depth_and_cost() {
        let root = Rc::new(SearchNode::root(state("1 2 3 / 4 _ 5 / 6 7 8")));
        let mut rng = StdRng::seed_from_u64(1);
        let children = root.generate_children(&mut rng);

        assert_eq!(children.len(), 4);
        for child in &children {
            assert_eq!(child.depth(), 1);
            assert_eq!(child.g(), 1);
            assert_eq!(child.path(), vec![child.state().move_taken().unwrap()]);
        }

        let estimated = SearchNode::child(&root, state("1 _ 3 / 4 2 5 / 6 7 8")).with_estimate(3);
        assert_eq!((estimated.g(), estimated.h(), estimated.f()), (1, 3, 4));
    }

    #[test]
    fn path_follows_parent_chain() {
        let root = Rc::new(SearchNode::root(state("_ 1 / 2 3")));
        let right = Rc::new(SearchNode::child(
            &root,
            root.state().apply_move(Move::Right).unwrap(),
        ));
        let down = SearchNode::child(&right, right.state().apply_move(Move::Down).unwrap());

        assert_eq!(down.depth(), 2);
        assert_eq!(down.path(), vec![Move::Right, Move::Down]);
        assert!(!down.revisits_ancestor());

        let back = SearchNode::child(&right, right.state().apply_move(Move::Left).unwrap());
        assert!(back.revisits_ancestor());
    }

    #[test]
    fn long_chains_drop_without_overflow() {
        let mut node = Rc::new(SearchNode::root(state("_ 1 / 2 3")));
        for i in 0..200_000 {
            let movement = if i % 2 == 0 { Move::Right } else { Move::Left };
            let next = node.state().apply_move(movement).unwrap();
            node = Rc::new(SearchNode::child(&node, next));
        }
        assert_eq!(node.depth(), 200_000);
        drop(node);
    }
}
