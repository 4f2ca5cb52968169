//! Dependency tracking between formula cells
//!
//! For a cell A whose formula reads cell B, the graph records the edge
//! B -> A ("A depends on B"). Range references are kept as interval
//! descriptors and tested for membership lazily; a formula over
//! `A1:Z100000` never materializes one edge per covered cell.

use crate::ast::Reference;
use crate::error::{FormulaError, FormulaResult};
use ahash::{AHashMap, AHashSet};
use gridcalc_core::CellAddress;

/// Dependency graph for formula cells
///
/// The graph is kept acyclic: [`DependencyGraph::set_dependencies`]
/// refuses any edit that would close a cycle, before mutating anything.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell -> the reference units its formula reads (cells and
    /// un-expanded ranges). A cell appears here iff it holds a formula.
    precedents: AHashMap<CellAddress, Vec<Reference>>,
    /// Cell -> cells whose formulas reference it directly
    dependents: AHashMap<CellAddress, AHashSet<CellAddress>>,
    /// One entry per range reference: any cell inside the range has the
    /// recorded cell as a dependent. Linear in the number of range
    /// formulas, not in covered cells.
    range_dependents: Vec<(gridcalc_core::CellRange, CellAddress)>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dependencies of `addr` with `refs`, atomically
    ///
    /// Checks whether the proposed reference set, combined with all
    /// existing edges, would close a cycle through `addr`. If so, fails
    /// with [`FormulaError::Cycle`] carrying the cycle path and leaves
    /// the graph untouched. Otherwise removes `addr`'s prior edges and
    /// installs the new ones.
    pub fn set_dependencies(
        &mut self,
        addr: CellAddress,
        refs: Vec<Reference>,
    ) -> FormulaResult<()> {
        // Check first, commit after
        if let Some(path) = self.find_cycle(addr, &refs) {
            return Err(FormulaError::Cycle { path });
        }

        self.remove_dependencies(addr);

        for reference in &refs {
            match reference {
                Reference::Cell(src) => {
                    self.dependents.entry(*src).or_default().insert(addr);
                }
                Reference::Range(range) => {
                    self.range_dependents.push((*range, addr));
                }
            }
        }
        self.precedents.insert(addr, refs);

        Ok(())
    }

    /// Remove all dependencies of `addr` (it no longer holds a formula)
    pub fn remove_dependencies(&mut self, addr: CellAddress) {
        if let Some(old_refs) = self.precedents.remove(&addr) {
            for reference in old_refs {
                if let Reference::Cell(src) = reference {
                    if let Some(deps) = self.dependents.get_mut(&src) {
                        deps.remove(&addr);
                        if deps.is_empty() {
                            self.dependents.remove(&src);
                        }
                    }
                }
            }
            self.range_dependents.retain(|(_, dep)| *dep != addr);
        }
    }

    /// The reference units `addr`'s formula reads, if it holds one
    pub fn precedents_of(&self, addr: &CellAddress) -> Option<&[Reference]> {
        self.precedents.get(addr).map(|v| v.as_slice())
    }

    /// Cells whose formulas read `addr`, directly or through a range
    ///
    /// Sorted by address for deterministic traversal.
    pub fn dependents_of(&self, addr: &CellAddress) -> Vec<CellAddress> {
        let mut result: Vec<CellAddress> = self
            .dependents
            .get(addr)
            .into_iter()
            .flat_map(|set| set.iter().copied())
            .collect();

        for (range, dep) in &self.range_dependents {
            if range.contains(addr) && *dep != *addr {
                result.push(*dep);
            }
        }

        result.sort_unstable();
        result.dedup();
        result
    }

    /// All cells transitively dependent on the starting set, in an order
    /// where every cell appears after the cells it reads from
    ///
    /// The starting cells themselves are included. Ties among independent
    /// cells break by address order, so the result is stable for a given
    /// graph state.
    pub fn recalc_order(&self, start: &[CellAddress]) -> Vec<CellAddress> {
        let mut result = Vec::new();
        let mut visited = AHashSet::new();

        for &addr in start {
            self.post_order(addr, &mut visited, &mut result);
        }

        result.reverse();
        result
    }

    /// Number of formula cells currently tracked
    pub fn formula_cell_count(&self) -> usize {
        self.precedents.len()
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.precedents.clear();
        self.dependents.clear();
        self.range_dependents.clear();
    }

    // Post-order DFS over dependents with an explicit stack; reversing
    // the output yields a topological order. Dependency chains can run
    // to hundreds of thousands of cells, so no recursion here. The
    // graph is acyclic by construction, so no in-stack guard is needed.
    fn post_order(
        &self,
        addr: CellAddress,
        visited: &mut AHashSet<CellAddress>,
        result: &mut Vec<CellAddress>,
    ) {
        if visited.contains(&addr) {
            return;
        }

        // (cell, dependents already pushed)
        let mut stack = vec![(addr, false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                result.push(node);
                continue;
            }
            if !visited.insert(node) {
                continue;
            }
            stack.push((node, true));
            // Reversed so the smallest address is expanded first
            for dependent in self.dependents_of(&node).into_iter().rev() {
                if !visited.contains(&dependent) {
                    stack.push((dependent, false));
                }
            }
        }
    }

    // DFS from `origin` along precedent edges, looking for a path back
    // to `origin`; returns that path if one exists. `proposed` stands in
    // for `origin`'s own reference set so the check sees the graph as it
    // would be after the commit. One heap frame per path node, so
    // arbitrarily long chains cannot exhaust the call stack.
    fn find_cycle(
        &self,
        origin: CellAddress,
        proposed: &[Reference],
    ) -> Option<Vec<CellAddress>> {
        struct Frame {
            neighbors: Vec<CellAddress>,
            next: usize,
        }

        let mut visited = AHashSet::new();
        let mut path = vec![origin];
        let mut frames = vec![Frame {
            neighbors: self.precedent_cells(origin, origin, proposed),
            next: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            if frame.next >= frame.neighbors.len() {
                frames.pop();
                path.pop();
                continue;
            }

            let neighbor = frame.neighbors[frame.next];
            frame.next += 1;

            if neighbor == origin {
                path.push(neighbor);
                return Some(path);
            }
            if visited.insert(neighbor) {
                path.push(neighbor);
                frames.push(Frame {
                    neighbors: self.precedent_cells(neighbor, origin, proposed),
                    next: 0,
                });
            }
        }

        None
    }

    // The cells `node` reads that can matter to a cycle through `origin`:
    // direct cell references, plus (for range references) the origin if
    // covered and any tracked formula cell inside the range.
    fn precedent_cells(
        &self,
        node: CellAddress,
        origin: CellAddress,
        proposed: &[Reference],
    ) -> Vec<CellAddress> {
        let refs: &[Reference] = if node == origin {
            proposed
        } else {
            match self.precedents.get(&node) {
                Some(refs) => refs,
                None => return Vec::new(), // literal or empty cell, dead end
            }
        };

        let mut cells = Vec::new();
        for reference in refs {
            match reference {
                Reference::Cell(src) => cells.push(*src),
                Reference::Range(range) => {
                    if range.contains(&origin) {
                        cells.push(origin);
                    }
                    for formula_cell in self.precedents.keys() {
                        if range.contains(formula_cell) {
                            cells.push(*formula_cell);
                        }
                    }
                }
            }
        }
        cells
    }
}
