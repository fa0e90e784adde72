//! End-to-end topology and sizing scenarios on small networks with known
//! geometry.

use hn_catalog::{NetworkFluid, PipeCatalog, PipeCatalogEntry};
use hn_core::{EdgeId, NodeId, PipeId, mm, watts};
use hn_geometry::Point3;
use hn_network::{Network, NodeRole, SizingParams};

fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

/// Colinear A(0,0) - B(10,0) - C(20,0) with A the source.
fn colinear_abc() -> (Network, [NodeId; 3]) {
    let mut net = Network::new("abc");
    let a = net.add_node(NodeId::new(1), p(0.0, 0.0), NodeRole::Source, true).unwrap();
    let b = net.add_node(NodeId::new(2), p(10.0, 0.0), NodeRole::Mixer, true).unwrap();
    let c = net.add_node(NodeId::new(3), p(20.0, 0.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(EdgeId::new(1), a, b, true, Some(PipeId::new(1))).unwrap();
    net.add_edge(EdgeId::new(2), b, c, true, Some(PipeId::new(1))).unwrap();
    (net, [a, b, c])
}

fn catalog() -> PipeCatalog {
    PipeCatalog::from_entries([
        PipeCatalogEntry::new(PipeId::new(1), "DN20", mm(26.9), mm(2.6), mm(0.07)),
        PipeCatalogEntry::new(PipeId::new(2), "DN32", mm(42.4), mm(2.6), mm(0.07)),
        PipeCatalogEntry::new(PipeId::new(3), "DN50", mm(60.3), mm(2.9), mm(0.07)),
        PipeCatalogEntry::new(PipeId::new(4), "DN80", mm(88.9), mm(3.2), mm(0.07)),
        PipeCatalogEntry::new(PipeId::new(5), "DN150", mm(168.3), mm(4.5), mm(0.07)),
    ])
    .unwrap()
}

#[test]
fn building_branches_at_mixer_and_path_has_length_15() {
    let (mut net, [a, b, _]) = colinear_abc();
    let d = net.add_node(NodeId::new(4), p(10.0, 5.0), NodeRole::Substation, true).unwrap();
    net.set_max_heating_demand(d, watts(5000.0));

    let connections = net.connect_buildings(false).unwrap();
    assert_eq!(connections.branches.len(), 1);
    assert!(connections.added_nodes.is_empty());
    let branch = &net[connections.branches[0]];
    assert_eq!(branch.endpoints(), [b, d]);
    assert!(!branch.is_supply);

    let paths = net.find_shortest_paths_for_buildings().unwrap();
    let path = &paths[&d];
    assert_eq!(path.source, a);
    assert_eq!(path.edges, vec![EdgeId::new(1), connections.branches[0]]);
    assert_eq!(path.length, 15.0);
}

#[test]
fn crossing_edges_get_a_single_junction() {
    let mut net = Network::new("x");
    let n1 = net.add_node(NodeId::new(1), p(0.0, 0.0), NodeRole::Mixer, true).unwrap();
    let n2 = net.add_node(NodeId::new(2), p(10.0, 10.0), NodeRole::Mixer, true).unwrap();
    let n3 = net.add_node(NodeId::new(3), p(0.0, 10.0), NodeRole::Mixer, true).unwrap();
    let n4 = net.add_node(NodeId::new(4), p(10.0, 0.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(EdgeId::new(1), n1, n2, true, Some(PipeId::new(2))).unwrap();
    net.add_edge(EdgeId::new(2), n3, n4, false, None).unwrap();

    let added = net.generate_intersections().unwrap();
    assert_eq!(added.added_nodes.len(), 1);
    assert_eq!(net.node_count(), 5);
    assert_eq!(net.edge_count(), 4);

    let junction = added.added_nodes[0];
    assert!((net[junction].position - p(5.0, 5.0)).norm() < 1e-9);
    assert_eq!(net.degree(junction), 4);
    for n in [n1, n2, n3, n4] {
        assert_eq!(net.degree(n), 1);
    }
    // Split halves keep pipe and supply flag of their original edge.
    let supply: Vec<_> = net.edges().filter(|e| e.is_supply).collect();
    assert_eq!(supply.len(), 2);
    assert!(supply.iter().all(|e| e.pipe == Some(PipeId::new(2))));
}

#[test]
fn connectivity_detects_isolated_edge() {
    let (mut net, _) = colinear_abc();
    assert!(net.check_connected_graph());

    let x = net.add_node(NodeId::new(10), p(50.0, 50.0), NodeRole::Mixer, true).unwrap();
    let y = net.add_node(NodeId::new(11), p(60.0, 50.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(EdgeId::new(10), x, y, true, None).unwrap();
    assert!(!net.check_connected_graph());
}

#[test]
fn collapse_preserves_length_and_terminals() {
    // Source - 3 bends - junction - 2 bends - substation, plus a second
    // substation off the junction.
    let mut net = Network::new("bends");
    let route = [
        (0.0, 0.0, NodeRole::Source),
        (10.0, 0.0, NodeRole::Mixer),
        (10.0, 10.0, NodeRole::Mixer),
        (20.0, 10.0, NodeRole::Mixer),
        (30.0, 10.0, NodeRole::Mixer),
        (30.0, 25.0, NodeRole::Mixer),
        (40.0, 25.0, NodeRole::Mixer),
        (40.0, 40.0, NodeRole::Substation),
    ];
    let ids: Vec<NodeId> = route
        .iter()
        .enumerate()
        .map(|(i, &(x, y, role))| net.add_node(NodeId::new(i as u32 + 1), p(x, y), role, true).unwrap())
        .collect();
    for w in ids.windows(2) {
        net.add_edge(net.next_edge_id().unwrap(), w[0], w[1], true, None).unwrap();
    }
    let s2 = net.add_node(NodeId::new(20), p(30.0, 0.0), NodeRole::Substation, true).unwrap();
    net.add_edge(net.next_edge_id().unwrap(), ids[4], s2, false, None).unwrap();

    let terminals: Vec<(NodeId, Point3)> = net
        .nodes()
        .filter(|n| n.role.is_terminal())
        .map(|n| (n.id, n.position))
        .collect();
    let total = net.total_length();

    let removed = net.collapse_redundant_edges();
    assert_eq!(removed, 5);
    assert_eq!(net.edge_count(), 3);
    assert!((net.total_length() - total).abs() < 1e-9);
    for (id, pos) in terminals {
        assert_eq!(net[id].position, pos);
    }
    assert!(net.check_connected_graph());
    // Second run finds nothing more to do.
    assert_eq!(net.collapse_redundant_edges(), 0);
}

#[test]
fn full_pipeline_sizes_every_edge() {
    let (mut net, _) = colinear_abc();
    let mut next = 100;
    for (x, y, q) in [(3.0, 6.0, 8_000.0), (14.0, -7.0, 12_000.0), (19.5, 4.0, 20_000.0)] {
        let s = net.add_node(NodeId::new(next), p(x, y), NodeRole::Substation, true).unwrap();
        net.set_max_heating_demand(s, watts(q));
        next += 1;
    }
    // A stray spur that leads nowhere.
    let spur = net.add_node(NodeId::new(50), p(20.0, -30.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(EdgeId::new(50), NodeId::new(3), spur, false, None).unwrap();

    net.connect_buildings(false).unwrap();
    assert_eq!(net.clean_dead_ends(), 1);
    assert!(net.check_connected_graph());

    let report = net
        .size_pipe_dimensions(&NetworkFluid::water(), &catalog(), &SizingParams::default())
        .unwrap();
    assert_eq!(report.sized, net.edge_count());
    assert_eq!(report.paths.len(), 3);
    assert!(net.edges().all(|e| e.pipe.is_some() && e.u_value.is_some()));

    // The trunk leaving the source carries every building.
    let trunk = net
        .edges()
        .find(|e| e.touches(NodeId::new(1)))
        .unwrap();
    assert_eq!(trunk.nominal_heating_demand.value, 40_000.0);
}

#[test]
fn sizing_is_monotonic_in_demand() {
    let mut previous = 0.0;
    for q in [1e3, 1e4, 5e4, 1e5, 3e5, 1e6] {
        let (mut net, _) = colinear_abc();
        let d = net.add_node(NodeId::new(4), p(10.0, 5.0), NodeRole::Substation, true).unwrap();
        net.set_max_heating_demand(d, watts(q));
        net.connect_buildings(false).unwrap();
        net.size_pipe_dimensions(&NetworkFluid::water(), &catalog(), &SizingParams::default())
            .unwrap();

        let pipe = net[EdgeId::new(1)].pipe.unwrap();
        let d_in = catalog().get(pipe).unwrap().inside_diameter().value;
        assert!(d_in >= previous, "demand {q} chose a smaller pipe");
        previous = d_in;
    }
}

#[test]
fn dijkstra_length_is_sum_of_edges_and_beats_alternatives() {
    // Ladder: two rails joined by rungs; the substation sits on the far end.
    let mut net = Network::new("ladder");
    let src = net.add_node(NodeId::new(1), p(0.0, 0.0), NodeRole::Source, true).unwrap();
    let mut top = src;
    let mut bottom = net.add_node(NodeId::new(2), p(0.0, 8.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(net.next_edge_id().unwrap(), top, bottom, true, None).unwrap();
    for k in 1..=4 {
        let x = 10.0 * k as f64;
        let t = net.add_node(net.next_node_id().unwrap(), p(x, 0.0), NodeRole::Mixer, true).unwrap();
        let b = net.add_node(net.next_node_id().unwrap(), p(x, 8.0 + k as f64), NodeRole::Mixer, true).unwrap();
        net.add_edge(net.next_edge_id().unwrap(), top, t, true, None).unwrap();
        net.add_edge(net.next_edge_id().unwrap(), bottom, b, true, None).unwrap();
        net.add_edge(net.next_edge_id().unwrap(), t, b, true, None).unwrap();
        top = t;
        bottom = b;
    }
    net.set_role(bottom, NodeRole::Substation);
    net.set_max_heating_demand(bottom, watts(1000.0));

    let paths = net.find_shortest_paths_for_buildings().unwrap();
    let path = &paths[&bottom];
    let sum: f64 = path.edges.iter().map(|&e| net[e].length()).sum();
    assert!((path.length - sum).abs() < 1e-12);

    // Down the first rung, then along the slightly slanted bottom rail.
    let bottom_route = 8.0 + 4.0 * 101.0_f64.sqrt();
    let top_route = 40.0 + 12.0;
    assert_eq!(path.edges.len(), 5);
    assert!((path.length - bottom_route).abs() < 1e-9);
    assert!(path.length < top_route);
}

#[test]
fn collapsed_network_can_be_normalized_again() {
    let mut net = Network::new("rerun");
    let a = net.add_node(NodeId::new(1), p(0.0, 0.0), NodeRole::Source, true).unwrap();
    let m1 = net.add_node(NodeId::new(2), p(30.0, 0.0), NodeRole::Mixer, true).unwrap();
    let m2 = net.add_node(NodeId::new(3), p(30.0, 20.0), NodeRole::Mixer, true).unwrap();
    let s = net.add_node(NodeId::new(4), p(50.0, 20.0), NodeRole::Substation, true).unwrap();
    net.set_max_heating_demand(s, watts(10_000.0));
    net.add_edge(EdgeId::new(1), a, m1, true, Some(PipeId::new(2))).unwrap();
    net.add_edge(EdgeId::new(2), m1, m2, true, Some(PipeId::new(2))).unwrap();
    net.add_edge(EdgeId::new(3), m2, s, true, Some(PipeId::new(2))).unwrap();
    assert_eq!(net.collapse_redundant_edges(), 2);

    // A street crossing the bent trunk and a new building next to it.
    let c = net.add_node(NodeId::new(5), p(20.0, -5.0), NodeRole::Mixer, true).unwrap();
    let d = net.add_node(NodeId::new(6), p(20.0, 5.0), NodeRole::Mixer, true).unwrap();
    net.add_edge(EdgeId::new(4), c, d, false, None).unwrap();
    let t = net.add_node(NodeId::new(7), p(25.0, 5.0), NodeRole::Substation, true).unwrap();
    net.set_max_heating_demand(t, watts(5000.0));

    let crossings = net.generate_intersections().unwrap();
    assert_eq!(crossings.added_nodes.len(), 1);
    let junction = crossings.added_nodes[0];
    assert_eq!(net[junction].position, p(20.0, 0.0));

    let buildings = net.connect_buildings(false).unwrap();
    assert!(buildings.unconnected.is_empty());
    assert_eq!(buildings.branches.len(), 1);
    assert_eq!(net[buildings.branches[0]].length(), 5.0);

    assert_eq!(net.clean_dead_ends(), 2);
    assert!(net.check_connected_graph());
    let paths = net.find_shortest_paths_for_buildings().unwrap();
    assert_eq!(paths[&t].length, 30.0);
    assert_eq!(paths[&s].length, 70.0);
}
