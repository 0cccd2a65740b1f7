use mirror_tree::{BoxError, Error, Hooks, Leaf, Node, Parent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Attach { value: i32, index: usize, handle: u32 },
    Detach { value: i32, index: usize, handle: u32 },
}

/// Records every hook call and hands out sequential handles.
#[derive(Default)]
struct Journal {
    events: Vec<Event>,
    next_handle: u32,
    live: Vec<u32>,
    fail_attach_on: Option<i32>,
    fail_detach: bool,
}

impl Journal {
    fn attaches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Attach { .. }))
            .count()
    }

    fn detaches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Detach { .. }))
            .count()
    }
}

type Item = Leaf<i32, u32, Journal>;

struct ListHooks;

impl Hooks for ListHooks {
    type Value = Vec<i32>;
    type Handle = ();
    type Context = Journal;
    type Child = Node<Item>;

    fn attach(
        &mut self,
        cx: &mut Journal,
        parent: Parent<'_, Self>,
        value: i32,
        index: usize,
    ) -> Result<Node<Item>, BoxError> {
        if cx.fail_attach_on == Some(value) {
            return Err(format!("cannot render {value}").into());
        }
        let handle = cx.next_handle;
        cx.next_handle += 1;
        cx.live.push(handle);
        cx.events.push(Event::Attach {
            value,
            index,
            handle,
        });
        parent.value.insert(index, value);
        Ok(Node::new(value, handle, Leaf::new()))
    }

    fn detach(
        &mut self,
        cx: &mut Journal,
        parent: Parent<'_, Self>,
        node: Node<Item>,
        index: usize,
    ) -> Result<(), BoxError> {
        let parts = node.into_parts();
        cx.live.retain(|&h| h != parts.handle);
        cx.events.push(Event::Detach {
            value: parts.value,
            index,
            handle: parts.handle,
        });
        parent.value.remove(index);
        if cx.fail_detach {
            return Err("detach refused".into());
        }
        Ok(())
    }
}

/// Two levels of lists: each row of the grid is a `ListHooks` node.
struct GridHooks;

impl Hooks for GridHooks {
    type Value = Vec<Vec<i32>>;
    type Handle = ();
    type Context = Journal;
    type Child = Node<ListHooks>;

    fn attach(
        &mut self,
        cx: &mut Journal,
        parent: Parent<'_, Self>,
        row: Vec<i32>,
        index: usize,
    ) -> Result<Node<ListHooks>, BoxError> {
        let mut node = Node::new(Vec::new(), (), ListHooks);
        node.insert_all(cx, row.iter().copied(), None)?;
        parent.value.insert(index, row);
        Ok(node)
    }

    fn detach(
        &mut self,
        cx: &mut Journal,
        parent: Parent<'_, Self>,
        mut node: Node<ListHooks>,
        index: usize,
    ) -> Result<(), BoxError> {
        node.clear(cx)?;
        parent.value.remove(index);
        Ok(())
    }
}

fn grid(rows: &[&[i32]]) -> (Node<GridHooks>, Journal) {
    let mut journal = Journal::default();
    let mut root = Node::new(Vec::new(), (), GridHooks);
    root.insert_all(&mut journal, rows.iter().map(|row| row.to_vec()), None)
        .expect("build grid");
    journal.events.clear();
    (root, journal)
}

/// Empty any node, whatever its hooks.
fn drain<K: Hooks>(node: &mut Node<K>, cx: &mut K::Context) -> usize {
    let before = node.len();
    node.clear(cx).map(|node| before - node.len()).unwrap_or(0)
}

fn list(values: &[i32]) -> (Node<ListHooks>, Journal) {
    let mut journal = Journal::default();
    let mut root = Node::new(Vec::new(), (), ListHooks);
    root.insert_all(&mut journal, values.iter().copied(), None)
        .expect("build list");
    journal.events.clear();
    (root, journal)
}

fn child_values(root: &Node<ListHooks>) -> Vec<i32> {
    root.children().iter().map(|c| *c.value()).collect()
}

fn assert_in_sync(root: &Node<ListHooks>) {
    assert_eq!(root.len(), root.value().len());
    for (i, expected) in root.value().iter().enumerate() {
        assert_eq!(root.get(i).map(|c| *c.value()), Some(*expected));
    }
}

// ============================================================================
// Insert Tests
// ============================================================================

#[test]
fn test_insert_appends_by_default() {
    let (mut root, mut journal) = list(&[1, 2]);
    root.insert(&mut journal, 3, None).unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3]);
    assert_eq!(
        journal.events,
        vec![Event::Attach {
            value: 3,
            index: 2,
            handle: 2
        }]
    );
    assert_in_sync(&root);
}

#[test]
fn test_insert_in_middle_passes_final_index() {
    let (mut root, mut journal) = list(&[1, 3]);
    root.insert(&mut journal, 2, Some(1)).unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3]);
    assert!(matches!(
        journal.events[0],
        Event::Attach { value: 2, index: 1, .. }
    ));
    assert_in_sync(&root);
}

#[test]
fn test_insert_past_end_is_clamped() {
    let (mut root, mut journal) = list(&[1]);
    root.insert(&mut journal, 9, Some(40)).unwrap();

    assert_eq!(child_values(&root), vec![1, 9]);
    assert!(matches!(
        journal.events[0],
        Event::Attach { value: 9, index: 1, .. }
    ));
}

#[test]
fn test_insert_all_preserves_order_and_indices() {
    let (mut root, mut journal) = list(&[1, 5]);
    root.insert_all(&mut journal, [2, 3, 4], Some(1)).unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3, 4, 5]);
    let indices: Vec<usize> = journal
        .events
        .iter()
        .map(|e| match e {
            Event::Attach { index, .. } => *index,
            Event::Detach { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_in_sync(&root);
}

#[test]
fn test_children_point_back_at_parent() {
    let (root, _) = list(&[1, 2, 3]);
    for child in root.children() {
        assert_eq!(child.parent(), Some(root.id()));
    }
    assert_eq!(root.parent(), None);
}

// ============================================================================
// Remove / Replace Tests
// ============================================================================

#[test]
fn test_remove_detaches_once_with_pre_removal_index() {
    let (mut root, mut journal) = list(&[1, 2, 3]);
    root.remove(&mut journal, 1).unwrap();

    assert_eq!(child_values(&root), vec![1, 3]);
    assert_eq!(
        journal.events,
        vec![Event::Detach {
            value: 2,
            index: 1,
            handle: 1
        }]
    );
    assert_eq!(journal.live, vec![0, 2]);
}

#[test]
fn test_remove_out_of_range_is_noop() {
    let (mut root, mut journal) = list(&[1, 2]);
    root.remove(&mut journal, 2).unwrap();
    root.remove(&mut journal, 100).unwrap();

    assert_eq!(child_values(&root), vec![1, 2]);
    assert!(journal.events.is_empty());
}

#[test]
fn test_insert_then_remove_restores_state() {
    let (mut root, mut journal) = list(&[1, 2, 3]);
    let live_before = journal.live.clone();

    root.insert(&mut journal, 7, Some(1))
        .unwrap()
        .remove(&mut journal, 1)
        .unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3]);
    assert_eq!(root.value(), &vec![1, 2, 3]);
    assert_eq!(journal.live, live_before);
}

#[test]
fn test_replace_rebuilds_slot() {
    let (mut root, mut journal) = list(&[1, 2, 3]);
    let old_id = root.get(1).unwrap().id();

    root.replace(&mut journal, 20, 1).unwrap();

    assert_eq!(child_values(&root), vec![1, 20, 3]);
    assert_ne!(root.get(1).unwrap().id(), old_id);
    assert_eq!(journal.detaches(), 1);
    assert_eq!(journal.attaches(), 1);
    assert_in_sync(&root);
}

#[test]
fn test_clear_detaches_last_first() {
    let (mut root, mut journal) = list(&[1, 2, 3]);
    root.clear(&mut journal).unwrap();

    assert!(root.is_empty());
    assert!(root.value().is_empty());
    let order: Vec<i32> = journal
        .events
        .iter()
        .map(|e| match e {
            Event::Detach { value, .. } => *value,
            Event::Attach { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(order, vec![3, 2, 1]);
    assert!(journal.live.is_empty());
}

#[test]
fn test_index_correctness_under_mixed_mutations() {
    let (mut root, mut journal) = list(&[]);
    let mut seed: u64 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for step in 0..200 {
        let len = root.len();
        let roll = next();
        if len == 0 || roll % 3 != 0 {
            let index = (next() as usize) % (len + 2);
            root.insert(&mut journal, step, Some(index)).unwrap();
        } else {
            let index = (next() as usize) % (len + 1);
            root.remove(&mut journal, index).unwrap();
        }
        assert_in_sync(&root);
        assert_eq!(journal.live.len(), root.len());
    }

    assert_eq!(journal.attaches() - journal.detaches(), root.len());
}

// ============================================================================
// Sort Tests
// ============================================================================

#[test]
fn test_sort_with_equal_comparator_touches_nothing() {
    let (mut root, mut journal) = list(&[3, 1, 2]);
    let ids: Vec<_> = root.children().iter().map(|c| c.id()).collect();

    root.sort_by(&mut journal, |_, _| std::cmp::Ordering::Equal)
        .unwrap();

    assert_eq!(child_values(&root), vec![3, 1, 2]);
    assert!(journal.events.is_empty());
    let after: Vec<_> = root.children().iter().map(|c| c.id()).collect();
    assert_eq!(ids, after);
}

#[test]
fn test_sort_orders_children() {
    let (mut root, mut journal) = list(&[5, 2, 9, 1, 7, 2]);
    root.sort_by(&mut journal, |a, b| a.cmp(b)).unwrap();

    let values = child_values(&root);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(values, vec![1, 2, 2, 5, 7, 9]);
    assert_in_sync(&root);
}

#[test]
fn test_sort_rotation_rebuilds_every_element() {
    let (mut root, mut journal) = list(&[3, 1, 2]);
    root.sort_by(&mut journal, |a, b| a.cmp(b)).unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3]);
    // Identity is only checked at a position, so none of the shifted nodes
    // are recognized.
    assert_eq!(journal.detaches(), 3);
    assert_eq!(journal.attaches(), 3);
}

#[test]
fn test_sort_keeps_nodes_already_in_place() {
    let (mut root, mut journal) = list(&[1, 3, 2]);
    let first = root.get(0).unwrap().id();

    root.sort_by(&mut journal, |a, b| a.cmp(b)).unwrap();

    assert_eq!(child_values(&root), vec![1, 2, 3]);
    assert_eq!(root.get(0).unwrap().id(), first);
    assert_eq!(journal.detaches(), 2);
    assert_eq!(journal.attaches(), 2);
}

#[test]
fn test_sort_is_stable() {
    let (mut root, mut journal) = list(&[21, 10, 22, 11]);
    // Compare by tens digit only; ties keep input order.
    root.sort_by(&mut journal, |a, b| (a / 10).cmp(&(b / 10)))
        .unwrap();
    assert_eq!(child_values(&root), vec![10, 11, 21, 22]);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_attach_failure_propagates_and_leaves_children() {
    let (mut root, mut journal) = list(&[1, 2]);
    journal.fail_attach_on = Some(8);

    let err = root.insert(&mut journal, 8, Some(0)).err().unwrap();

    assert!(matches!(err, Error::Attach { index: 0, .. }));
    assert!(err.to_string().contains("cannot render 8"));
    assert_eq!(child_values(&root), vec![1, 2]);
}

#[test]
fn test_insert_all_stops_at_first_failure() {
    let (mut root, mut journal) = list(&[]);
    journal.fail_attach_on = Some(3);

    let result = root.insert_all(&mut journal, [1, 2, 3, 4], None);

    assert!(result.is_err());
    assert_eq!(child_values(&root), vec![1, 2]);
}

#[test]
fn test_detach_failure_after_unlink() {
    let (mut root, mut journal) = list(&[1, 2]);
    journal.fail_detach = true;

    let err = root.remove(&mut journal, 0).err().unwrap();

    assert!(matches!(err, Error::Detach { index: 0, .. }));
    // The child is already gone; there is no rollback.
    assert_eq!(child_values(&root), vec![2]);
}

// ============================================================================
// Nested Tests
// ============================================================================

#[test]
fn test_nested_levels_link_and_release() {
    let (mut root, mut journal) = grid(&[&[1, 2], &[3]]);

    assert_eq!(root.len(), 2);
    assert_eq!(journal.live.len(), 3);
    for row in root.children() {
        assert_eq!(row.parent(), Some(root.id()));
        for cell in row.children() {
            assert_eq!(cell.parent(), Some(row.id()));
        }
    }

    root.remove(&mut journal, 0).unwrap();

    assert_eq!(root.value(), &vec![vec![3]]);
    assert_eq!(journal.detaches(), 2);
    assert_eq!(journal.live.len(), 1);
}

#[test]
fn test_nested_sort_rebuilds_rows_with_their_cells() {
    let (mut root, mut journal) = grid(&[&[1, 2], &[3]]);

    root.sort_by(&mut journal, |a, b| a.len().cmp(&b.len()))
        .unwrap();

    assert_eq!(root.value(), &vec![vec![3], vec![1, 2]]);
    let rebuilt: Vec<Vec<i32>> = root
        .children()
        .iter()
        .map(|row| row.value().clone())
        .collect();
    assert_eq!(&rebuilt, root.value());
    assert_eq!(journal.detaches(), 3);
    assert_eq!(journal.attaches(), 3);
    assert_eq!(journal.live.len(), 3);
}

#[test]
fn test_generic_drain_releases_every_level() {
    let (mut root, mut journal) = grid(&[&[1], &[2, 3], &[4, 5, 6]]);

    assert_eq!(drain(&mut root, &mut journal), 3);

    assert!(root.is_empty());
    assert!(journal.live.is_empty());
    assert_eq!(journal.detaches(), 6);
}
