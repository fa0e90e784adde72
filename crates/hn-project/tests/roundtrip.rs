use hn_core::{EdgeId, NodeId, PipeId};
use hn_project::schema::*;
use hn_project::{ProjectError, load_file, save_file, save_results, to_network, validate_file};

fn sample() -> NetworkFile {
    NetworkFile {
        name: "Street".to_string(),
        network_type: NetworkTypeDef::DoublePipe,
        origin: [0.0, 0.0, 0.0],
        settings: SettingsDef::default(),
        sizing: SizingDef::default(),
        fluid: FluidDef::default(),
        pipes: vec![PipeDef {
            id: PipeId::new(1),
            name: "DN32".to_string(),
            outside_diameter_mm: 42.4,
            wall_thickness_mm: 2.6,
            roughness_mm: 0.07,
            insulation_thickness_mm: 0.0,
            insulation_conductivity_w_m_k: 0.0,
            wall_conductivity_w_m_k: 50.0,
        }],
        available_pipes: vec![PipeId::new(1)],
        simultaneity: None,
        nodes: vec![
            NodeDef {
                id: NodeId::new(1),
                position: [0.0, 0.0, 0.0],
                kind: NodeKind::Source,
                max_heating_demand_w: 0.0,
            },
            NodeDef {
                id: NodeId::new(2),
                position: [40.0, 0.0, 0.0],
                kind: NodeKind::Mixer,
                max_heating_demand_w: 0.0,
            },
            NodeDef {
                id: NodeId::new(3),
                position: [20.0, 12.0, 0.0],
                kind: NodeKind::Substation,
                max_heating_demand_w: 15_000.0,
            },
        ],
        edges: vec![EdgeDef {
            id: EdgeId::new(1),
            node1: NodeId::new(1),
            node2: NodeId::new(2),
            supply: true,
            pipe: Some(PipeId::new(1)),
            waypoints: vec![],
        }],
    }
}

#[test]
fn roundtrip_yaml_and_json() {
    let file = sample();
    validate_file(&file).unwrap();

    let dir = std::env::temp_dir();
    for name in ["hn_project_roundtrip.yaml", "hn_project_roundtrip.json"] {
        let path = dir.join(name);
        save_file(&path, &file).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(file, loaded);
    }
}

#[test]
fn yaml_defaults_fill_omitted_sections() {
    let yaml = r#"
name: Minimal
nodes:
  - id: 1
    position: [0.0, 0.0, 0.0]
    kind: source
  - id: 2
    position: [5.0, 0.0, 0.0]
    kind: substation
    max_heating_demand_w: 3000.0
edges:
  - id: 1
    node1: 1
    node2: 2
    supply: true
"#;
    let file: NetworkFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.network_type, NetworkTypeDef::DoublePipe);
    assert_eq!(file.settings, SettingsDef::default());
    assert_eq!(file.sizing.max_pressure_loss_pa_per_m, 150.0);
    assert_eq!(file.fluid.name, "Water");
    let net = to_network(&file).unwrap();
    assert_eq!(net.total_length(), 5.0);
}

#[test]
fn invalid_file_is_refused_on_save() {
    let mut file = sample();
    file.edges[0].node2 = NodeId::new(42);
    let path = std::env::temp_dir().join("hn_project_invalid.yaml");
    assert!(matches!(
        save_file(&path, &file),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn pipeline_results_are_written() {
    let file = sample();
    let mut net = to_network(&file).unwrap();
    net.connect_buildings(false).unwrap();
    let report = net
        .size_pipe_dimensions(
            &hn_project::fluid_from_file(&file).unwrap(),
            &hn_project::catalog_from_file(&file).unwrap(),
            &hn_project::sizing_params(&file),
        )
        .unwrap();
    let results = hn_project::results_from_network(&net, Some(&report.paths));
    assert_eq!(results.edge_count, 3);
    assert_eq!(results.total_pipe_length_m, 2.0 * results.total_length_m);

    let path = std::env::temp_dir().join("hn_project_results.json");
    save_results(&path, &results).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let back: NetworkResults = serde_json::from_str(&text).unwrap();
    assert_eq!(back, results);
}
