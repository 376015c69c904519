use pdf_writer::{Ref, TextStr};

use crate::model::OutlineEntry;

use super::{PT_PER_MM, PdfWriter};

/// Nearest earlier entry with a smaller level.
pub(super) fn outline_parents(entries: &[OutlineEntry]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            while stack.last().is_some_and(|&top| entries[top].level >= entry.level) {
                stack.pop();
            }
            let parent = stack.last().copied();
            stack.push(i);
            parent
        })
        .collect()
}

struct OutlineTree {
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    // index of each entry within its parent's children (or `roots`)
    sibling_pos: Vec<usize>,
}

impl OutlineTree {
    fn build(parents: &[Option<usize>]) -> Self {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); parents.len()];
        let mut roots: Vec<usize> = Vec::new();
        let mut sibling_pos = vec![0; parents.len()];
        for (i, parent) in parents.iter().enumerate() {
            let siblings = match parent {
                Some(p) => &mut children[*p],
                None => &mut roots,
            };
            sibling_pos[i] = siblings.len();
            siblings.push(i);
        }
        Self {
            children,
            roots,
            sibling_pos,
        }
    }
}

impl PdfWriter {
    pub(super) fn write_outline(&mut self, entries: &[OutlineEntry]) -> Option<Ref> {
        if entries.is_empty() || self.page_ids.is_empty() {
            return None;
        }

        let parents = outline_parents(entries);
        let OutlineTree {
            children,
            roots,
            sibling_pos,
        } = OutlineTree::build(&parents);

        // Entries come in document order, so descendants follow their
        // ancestor contiguously; count them back to front.
        let mut descendants = vec![0i32; entries.len()];
        for i in (0..entries.len()).rev() {
            if let Some(p) = parents[i] {
                descendants[p] += descendants[i] + 1;
            }
        }

        let outline_id = self.alloc();
        let item_ids: Vec<Ref> = entries.iter().map(|_| self.alloc()).collect();
        let page_h = self.page_height_pt();
        let last_page = self.page_ids.len() - 1;

        for (i, entry) in entries.iter().enumerate() {
            let siblings: &[usize] = match parents[i] {
                Some(p) => &children[p],
                None => &roots,
            };
            let pos = sibling_pos[i];
            let page_id = self.page_ids[(entry.page_number.max(1) - 1).min(last_page)];

            let mut item = self.pdf.outline_item(item_ids[i]);
            item.title(TextStr(&entry.text));
            item.parent(parents[i].map_or(outline_id, |p| item_ids[p]));
            if pos > 0 {
                item.prev(item_ids[siblings[pos - 1]]);
            }
            if let Some(&next) = siblings.get(pos + 1) {
                item.next(item_ids[next]);
            }
            if let (Some(&first), Some(&last)) = (children[i].first(), children[i].last()) {
                item.first(item_ids[first]);
                item.last(item_ids[last]);
                item.count(descendants[i]);
            }
            item.dest()
                .page(page_id)
                .xyz(0.0, page_h - entry.top_mm * PT_PER_MM, None);
        }

        let mut outline = self.pdf.outline(outline_id);
        if let (Some(&first), Some(&last)) = (roots.first(), roots.last()) {
            outline.first(item_ids[first]);
            outline.last(item_ids[last]);
        }
        outline.count(entries.len() as i32);

        Some(outline_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: u8) -> OutlineEntry {
        OutlineEntry {
            text: format!("h{level}"),
            level,
            page_number: 1,
            top_mm: 20.0,
        }
    }

    #[test]
    fn nests_under_nearest_shallower_heading() {
        let levels = [1, 2, 3, 2, 1, 3, 2];
        let entries: Vec<_> = levels.iter().map(|&l| entry(l)).collect();
        assert_eq!(
            outline_parents(&entries),
            vec![None, Some(0), Some(1), Some(0), None, Some(4), Some(4)]
        );
    }

    #[test]
    fn sibling_positions_index_into_sibling_lists() {
        let levels = [1, 2, 3, 2, 1, 3, 2];
        let entries: Vec<_> = levels.iter().map(|&l| entry(l)).collect();
        let parents = outline_parents(&entries);
        let tree = OutlineTree::build(&parents);

        assert_eq!(tree.roots, vec![0, 4]);
        assert_eq!(tree.children[0], vec![1, 3]);
        assert_eq!(tree.children[4], vec![5, 6]);
        assert_eq!(tree.sibling_pos, vec![0, 0, 0, 1, 1, 0, 1]);
        for (i, parent) in parents.iter().enumerate() {
            let siblings = parent.map_or(&tree.roots, |p| &tree.children[p]);
            assert_eq!(siblings[tree.sibling_pos[i]], i);
        }
    }

    #[test]
    fn wide_flat_outline_keeps_positions_in_order() {
        let entries: Vec<_> = (0..5000).map(|_| entry(1)).collect();
        let tree = OutlineTree::build(&outline_parents(&entries));
        assert_eq!(tree.roots.len(), 5000);
        assert!(tree.sibling_pos.iter().enumerate().all(|(i, &pos)| pos == i));
    }

    #[test]
    fn document_starting_below_level_one_stays_flat() {
        let entries: Vec<_> = [3, 3, 2].iter().map(|&l| entry(l)).collect();
        assert_eq!(outline_parents(&entries), vec![None, None, None]);
    }
}
