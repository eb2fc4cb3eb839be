//! Ordered tree edit distance (Zhang–Shasha) over element tag names.

use std::collections::HashSet;

use bpmn_eval_xml::{Document, Element};

/// Label used for the single-node tree an unparsable document becomes.
const FALLBACK_LABEL: &str = "root";

/// Tree flattened in post-order with the bookkeeping Zhang–Shasha needs.
struct PostOrderTree {
    labels: Vec<String>,
    /// Post-order index of the leftmost leaf of each node's subtree.
    leftmost: Vec<usize>,
    keyroots: Vec<usize>,
}

impl PostOrderTree {
    fn from_xml(xml: &str) -> Self {
        match Document::parse(xml) {
            Ok(doc) => Self::from_element(doc.root()),
            Err(_) => Self::leaf(FALLBACK_LABEL),
        }
    }

    fn leaf(label: &str) -> Self {
        Self {
            labels: vec![label.to_string()],
            leftmost: vec![0],
            keyroots: vec![0],
        }
    }

    fn from_element(root: &Element) -> Self {
        let mut tree = Self {
            labels: Vec::new(),
            leftmost: Vec::new(),
            keyroots: Vec::new(),
        };
        tree.visit(root);

        let mut seen = HashSet::new();
        for node in (0..tree.len()).rev() {
            if seen.insert(tree.leftmost[node]) {
                tree.keyroots.push(node);
            }
        }
        tree.keyroots.reverse();
        tree
    }

    fn visit(&mut self, element: &Element) -> usize {
        let mut first_leaf = None;
        for child in element.child_elements() {
            let index = self.visit(child);
            if first_leaf.is_none() {
                first_leaf = Some(self.leftmost[index]);
            }
        }
        let index = self.labels.len();
        self.labels.push(element.local_name().to_string());
        self.leftmost.push(first_leaf.unwrap_or(index));
        index
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Unit-cost edit distance between the element trees of two documents.
pub fn edit_distance(predicted: &str, ground_truth: &str) -> usize {
    let a = PostOrderTree::from_xml(predicted);
    let b = PostOrderTree::from_xml(ground_truth);
    zhang_shasha(&a, &b)
}

/// Edit distance normalized by the size of the larger tree, in `[0, 1]`.
pub fn tree_edit_distance(predicted: &str, ground_truth: &str) -> f64 {
    let a = PostOrderTree::from_xml(predicted);
    let b = PostOrderTree::from_xml(ground_truth);
    let largest = a.len().max(b.len());
    if largest == 0 {
        return 1.0;
    }
    zhang_shasha(&a, &b) as f64 / largest as f64
}

fn zhang_shasha(a: &PostOrderTree, b: &PostOrderTree) -> usize {
    let mut tree_dist = vec![vec![0usize; b.len()]; a.len()];

    for &i in &a.keyroots {
        for &j in &b.keyroots {
            let li = a.leftmost[i];
            let lj = b.leftmost[j];
            let rows = i - li + 2;
            let cols = j - lj + 2;
            let mut forest = vec![vec![0usize; cols]; rows];

            for di in 1..rows {
                forest[di][0] = forest[di - 1][0] + 1;
            }
            for dj in 1..cols {
                forest[0][dj] = forest[0][dj - 1] + 1;
            }

            for di in 1..rows {
                let x = li + di - 1;
                for dj in 1..cols {
                    let y = lj + dj - 1;
                    let delete = forest[di - 1][dj] + 1;
                    let insert = forest[di][dj - 1] + 1;
                    if a.leftmost[x] == li && b.leftmost[y] == lj {
                        let relabel = usize::from(a.labels[x] != b.labels[y]);
                        let value = delete.min(insert).min(forest[di - 1][dj - 1] + relabel);
                        forest[di][dj] = value;
                        tree_dist[x][y] = value;
                    } else {
                        let p = a.leftmost[x] - li;
                        let q = b.leftmost[y] - lj;
                        forest[di][dj] = delete.min(insert).min(forest[p][q] + tree_dist[x][y]);
                    }
                }
            }
        }
    }

    tree_dist[a.len() - 1][b.len() - 1]
}
