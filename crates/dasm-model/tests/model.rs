//! JSON interchange of the project model.

use dasm_model::{
    BasicType, DataType, FileType, Freeze, MEMORY_SIZE, Memory, Patch, Project, ROWS,
};

fn sample_project() -> Project {
    let mut project = Project::new();
    project.name = "demo".to_string();
    project.source_file = "demo.prg".to_string();
    project.file_type = FileType::Prg;
    project.set_input(vec![0x01, 0x08, 0x0b, 0x08]);
    project.memory_flags[1] = 4;

    let cell = &mut project.memory[0x0801];
    cell.is_inside = true;
    cell.is_code = true;
    cell.user_location = Some("start".to_string());
    cell.dasm_comment = Some(String::new());
    cell.data_type = DataType::Word;
    cell.basic_type = BasicType::BasicV2_0;

    project.constant.set(1, ROWS - 1, Some("LAST".to_string())).unwrap();
    project.constant.set_comment(0, 0, Some("zero page".to_string())).unwrap();
    project.patches.push(Patch {
        address: 0x0810,
        value: 0x20,
    });
    project.freezes.push(Freeze {
        name: "v1".to_string(),
        text: "lda #$00\n".to_string(),
    });
    project
}

#[test]
fn project_json_round_trip() {
    let project = sample_project();
    let json = serde_json::to_string(&project).expect("serialize project");
    let round: Project = serde_json::from_str(&json).expect("deserialize project");
    assert_eq!(round, project);
    assert_eq!(round.memory[0x0801].dasm_comment.as_deref(), Some(""));
    assert_eq!(round.memory[0x0802].dasm_comment, None);
}

#[test]
fn project_json_uses_names_and_hex() {
    let project = sample_project();
    let value = serde_json::to_value(&project).expect("serialize project");
    assert_eq!(value["file_type"], "PRG");
    assert_eq!(value["file"], "demo.prg");
    assert_eq!(value["input_bytes"], "01080b08");
    assert_eq!(value["memory"][0x0801]["data_type"], "WORD");
    assert_eq!(value["constant"]["table"][0]["value"], "LAST");
}

#[test]
fn memory_json_requires_full_address_space() {
    let json = serde_json::to_string(&Memory::new()).unwrap();
    let memory: Memory = serde_json::from_str(&json).unwrap();
    assert_eq!(memory.len(), MEMORY_SIZE);

    assert!(serde_json::from_str::<Memory>("[]").is_err());
}

#[test]
fn constant_json_rejects_out_of_range_cells() {
    let json = r#"{"table":[{"column":25,"row":0,"value":"X"}],"comment":[]}"#;
    assert!(serde_json::from_str::<dasm_model::Constant>(json).is_err());
}
