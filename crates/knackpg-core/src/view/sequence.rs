use super::View;
use crate::{Error, Result};

use indexmap::IndexMap;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Orders views so every view comes after the views it reads.
///
/// Roots are visited in input order, so the output is deterministic. A cycle
/// fails the whole sequence.
pub fn sequence(views: Vec<View>) -> Result<Vec<View>> {
    let positions: IndexMap<&str, usize> = views
        .iter()
        .enumerate()
        .map(|(i, view)| (view.name.as_str(), i))
        .collect();

    let mut sequencer = Sequencer {
        views: &views,
        positions,
        marks: vec![Mark::Unvisited; views.len()],
        path: vec![],
        order: Vec::with_capacity(views.len()),
    };

    for i in 0..views.len() {
        sequencer.visit(i)?;
    }

    let order = sequencer.order;
    let mut slots: Vec<Option<View>> = views.into_iter().map(Some).collect();

    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

struct Sequencer<'a> {
    views: &'a [View],
    positions: IndexMap<&'a str, usize>,
    marks: Vec<Mark>,

    /// Views on the current DFS path
    path: Vec<usize>,

    order: Vec<usize>,
}

impl Sequencer<'_> {
    fn visit(&mut self, i: usize) -> Result<()> {
        match self.marks[i] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = self.path.iter().position(|j| *j == i).unwrap_or(0);
                let members = self.path[start..]
                    .iter()
                    .map(|j| self.views[*j].name.clone())
                    .collect();
                return Err(Error::cyclic_view_dependency(members));
            }
            Mark::Unvisited => {}
        }

        self.marks[i] = Mark::Visiting;
        self.path.push(i);

        let views = self.views;
        for dependency in &views[i].depends_on {
            match self.positions.get(dependency.as_str()) {
                Some(&j) => self.visit(j)?,
                None => debug!(
                    "view `{}` reads `{dependency}`, which is not generated",
                    views[i].name
                ),
            }
        }

        self.path.pop();
        self.marks[i] = Mark::Done;
        self.order.push(i);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str, depends_on: &[&str]) -> View {
        let mut view = View::new(name, "public", name.trim_end_matches("_view"));
        view.depends_on = depends_on.iter().map(|dep| dep.to_string()).collect();
        view
    }

    fn names(views: &[View]) -> Vec<&str> {
        views.iter().map(|view| view.name.as_str()).collect()
    }

    #[test]
    fn independent_views_keep_input_order() {
        let views = sequence(vec![view("a", &[]), view("b", &[]), view("c", &[])]).unwrap();
        assert_eq!(names(&views), ["a", "b", "c"]);
    }

    #[test]
    fn diamond() {
        let views = sequence(vec![
            view("top", &["left", "right"]),
            view("left", &["bottom"]),
            view("right", &["bottom"]),
            view("bottom", &[]),
        ])
        .unwrap();

        assert_eq!(names(&views), ["bottom", "left", "right", "top"]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let err = sequence(vec![view("a", &["a"])]).unwrap_err();
        assert_eq!(err.cycle_members(), Some(&["a".to_string()][..]));
    }

    #[test]
    fn cycle_members_exclude_the_entry_path() {
        let err = sequence(vec![
            view("entry", &["x"]),
            view("x", &["y"]),
            view("y", &["x"]),
        ])
        .unwrap_err();

        assert_eq!(err.to_string(), "cyclic view dependency: x -> y -> x");
    }

    #[test]
    fn unknown_dependencies_are_ignored() {
        let views = sequence(vec![view("a", &["gone_view"])]).unwrap();
        assert_eq!(names(&views), ["a"]);
    }
}
