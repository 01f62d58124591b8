use super::*;
use crate::graph::CanonicalEdge;

fn graph(pairs: &[(&str, &str)]) -> CanonicalGraph {
    pairs.iter().map(|(from, to)| CanonicalEdge::new(*from, "", *to)).collect()
}

// =============================================================================
// GENERATIONS
// =============================================================================

#[test]
fn chain_gets_increasing_generations() {
    let layout = layout(&graph(&[("X", "Y"), ("Y", "Z")]), 1000.0).unwrap();
    assert_eq!(layout.generation("X"), Some(0));
    assert_eq!(layout.generation("Y"), Some(1));
    assert_eq!(layout.generation("Z"), Some(2));
    assert_eq!(layout.layer_count(), 3);
}

#[test]
fn generation_zero_is_exactly_the_sources() {
    let g = graph(&[("A", "C"), ("B", "C"), ("C", "D"), ("E", "D"), ("A", "D")]);
    let layout = layout(&g, 100.0).unwrap();
    let sources: Vec<&str> = layout.layers()[0].clone();
    assert_eq!(sources, vec!["A", "B", "E"]);
}

#[test]
fn generations_increase_along_every_edge() {
    let g = graph(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "D"), ("B", "D"), ("E", "B")]);
    let layout = layout(&g, 500.0).unwrap();
    for edge in &g {
        let from = layout.generation(&edge.from).unwrap();
        let to = layout.generation(&edge.to).unwrap();
        assert!(from < to, "{} ({from}) -> {} ({to})", edge.from, edge.to);
    }
}

#[test]
fn late_predecessor_pushes_node_one_past_it() {
    // D has predecessors in generation 0 (A) and generation 2 (C).
    let layout = layout(&graph(&[("A", "D"), ("A", "B"), ("B", "C"), ("C", "D")]), 10.0).unwrap();
    assert_eq!(layout.generation("C"), Some(2));
    assert_eq!(layout.generation("D"), Some(3));
}

#[test]
fn ties_follow_first_seen_order() {
    let layout = layout(&graph(&[("R", "z"), ("R", "a"), ("R", "m")]), 10.0).unwrap();
    assert_eq!(layout.layers(), vec![vec!["R"], vec!["z", "a", "m"]]);
}

#[test]
fn duplicate_edges_count_once() {
    let g: CanonicalGraph = vec![
        CanonicalEdge::new("A", "one", "B"),
        CanonicalEdge::new("A", "two", "B"),
        CanonicalEdge::new("B", "", "C"),
    ]
    .into_iter()
    .collect();
    let layout = layout(&g, 10.0).unwrap();
    assert_eq!(layout.generation("C"), Some(2));
    assert_eq!(layout.nodes().len(), 3);
}

#[test]
fn empty_graph_has_empty_layout() {
    let layout = layout(&CanonicalGraph::new(), 10.0).unwrap();
    assert!(layout.nodes().is_empty());
    assert_eq!(layout.layer_count(), 0);
}

#[test]
fn layout_is_deterministic() {
    let g = graph(&[("A", "B"), ("C", "B"), ("B", "D"), ("C", "E")]);
    assert_eq!(layout(&g, 300.0).unwrap(), layout(&g, 300.0).unwrap());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn three_cycle_is_rejected() {
    let err = layout(&graph(&[("A", "B"), ("B", "C"), ("C", "A")]), 1000.0).unwrap_err();
    assert_eq!(err, LayoutError::Cycle { remaining: vec!["A".into(), "B".into(), "C".into()] });
}

#[test]
fn self_loop_is_a_cycle() {
    let err = layout(&graph(&[("A", "B"), ("B", "B")]), 1000.0).unwrap_err();
    assert_eq!(err, LayoutError::Cycle { remaining: vec!["B".into()] });
}

#[test]
fn nodes_downstream_of_a_cycle_are_reported() {
    let err = layout(&graph(&[("S", "A"), ("A", "B"), ("B", "A"), ("B", "T")]), 1.0).unwrap_err();
    assert_eq!(err, LayoutError::Cycle { remaining: vec!["A".into(), "B".into(), "T".into()] });
}

#[test]
fn bad_scale_is_rejected() {
    let g = graph(&[("A", "B")]);
    assert!(matches!(layout(&g, 0.0), Err(LayoutError::InvalidScale(_))));
    assert!(matches!(layout(&g, -5.0), Err(LayoutError::InvalidScale(_))));
    assert!(matches!(layout(&g, f64::NAN), Err(LayoutError::InvalidScale(_))));
    assert!(matches!(layout(&g, f64::INFINITY), Err(LayoutError::InvalidScale(_))));
}

// =============================================================================
// POSITIONS
// =============================================================================

#[test]
fn generations_span_the_x_axis() {
    let layout = layout(&graph(&[("X", "Y"), ("Y", "Z")]), 1000.0).unwrap();
    assert_eq!(layout.position("X"), Some(Position::new(-1000.0, 0.0)));
    assert_eq!(layout.position("Y"), Some(Position::new(0.0, 0.0)));
    assert_eq!(layout.position("Z"), Some(Position::new(1000.0, 0.0)));
}

#[test]
fn layer_members_are_centered_and_apart() {
    let layout = layout(&graph(&[("A", "B"), ("A", "C")]), 600.0).unwrap();
    assert_eq!(layout.position("A"), Some(Position::new(-600.0, 0.0)));
    assert_eq!(layout.position("B"), Some(Position::new(600.0, -300.0)));
    assert_eq!(layout.position("C"), Some(Position::new(600.0, 300.0)));
}

#[test]
fn isolated_pair_sits_on_one_layer_each() {
    let layout = layout(&graph(&[("A", "B"), ("C", "D")]), 100.0).unwrap();
    assert_eq!(layout.layers(), vec![vec!["A", "C"], vec!["B", "D"]]);
    assert_eq!(layout.position("A"), Some(Position::new(-100.0, -50.0)));
    assert_eq!(layout.position("C"), Some(Position::new(-100.0, 50.0)));
}

#[test]
fn everything_fits_inside_scale_without_collisions() {
    let mut pairs = Vec::new();
    let names: Vec<String> = (0..12).map(|i| format!("n{i}")).collect();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if (i * 7 + j * 3) % 5 == 0 {
                pairs.push((names[i].as_str(), names[j].as_str()));
            }
        }
    }
    let scale = 250.0;
    let layout = layout(&graph(&pairs), scale).unwrap();

    for node in layout.nodes() {
        assert!(node.position.x.abs() <= scale && node.position.y.abs() <= scale, "{node:?}");
    }
    for a in layout.nodes() {
        for b in layout.nodes() {
            if a.caption != b.caption {
                assert_ne!(a.position, b.position, "{} collides with {}", a.caption, b.caption);
            }
        }
    }
    let mut by_gen = layout.nodes().to_vec();
    by_gen.sort_by_key(|n| n.generation);
    for pair in by_gen.windows(2) {
        if pair[0].generation < pair[1].generation {
            assert!(pair[0].position.x < pair[1].position.x);
        }
    }
}

#[test]
fn positions_map_covers_every_node() {
    let layout = layout(&graph(&[("A", "B"), ("B", "C")]), 10.0).unwrap();
    let positions = layout.positions();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions["B"], Position::new(0.0, 0.0));
}

#[test]
fn last_layer_of_long_chain_stays_on_the_bound() {
    let names: Vec<String> = (0..16).map(|i| format!("n{i}")).collect();
    let pairs: Vec<(&str, &str)> = names.windows(2).map(|w| (w[0].as_str(), w[1].as_str())).collect();
    for scale in [100.0, 250.0, 1000.0] {
        let layout = layout(&graph(&pairs), scale).unwrap();
        for node in layout.nodes() {
            assert!(node.position.x.abs() <= scale, "{} at x={} exceeds scale {scale}", node.caption, node.position.x);
        }
        assert_eq!(layout.position("n0").unwrap().x, -scale);
        assert_eq!(layout.position("n15").unwrap().x, scale);
    }
}
