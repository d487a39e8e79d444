//! Older format versions decode with documented defaults.

use dasm_model::{
    BasicType, DataType, FileType, Freeze, MEMORY_SIZE, Patch, Project, Relocate, TargetType,
};
use dasm_store::{CURRENT_VERSION, WriteWireExt, decode, encode_as, peek_version};

fn full_project() -> Project {
    let mut project = Project::new();
    project.name = "old".into();
    project.file_type = FileType::Sid;
    project.target_type = TargetType::Vic20;
    project.set_input(vec![0x00, 0x10, 0x4c]);
    project.chip = 3;

    let cell = &mut project.memory[0x1000];
    cell.is_inside = true;
    cell.is_garbage = true;
    cell.data_type = DataType::Address;
    cell.index = 9;
    cell.related_address_base = 0x1000;
    cell.related_address_dest = 0x2000;
    cell.basic_type = BasicType::BasicV7_0;
    cell.user_location = Some("play".into());

    project.constant.set(1, 1, Some("BASE".into())).unwrap();
    project.constant.set(1, 0x300, Some("ROWS".into())).unwrap();
    project.constant.set(11, 1, Some("COLUMNS".into())).unwrap();
    project.constant.set_comment(1, 1, Some("note".into())).unwrap();

    project.relocates.push(Relocate {
        from_start: 1,
        from_end: 2,
        to_start: 3,
        to_end: 4,
    });
    project.patches.push(Patch {
        address: 5,
        value: 6,
    });
    project.freezes.push(Freeze {
        name: "f".into(),
        text: "t".into(),
    });
    project.bin_address = 0x1000;
    project
}

fn decode_at(version: u8) -> Project {
    let bytes = encode_as(&full_project(), version).unwrap();
    assert_eq!(peek_version(&bytes).unwrap(), version);
    decode(&bytes).unwrap()
}

#[test]
fn test_each_version_drops_only_newer_fields() {
    for version in 0..=CURRENT_VERSION {
        let p = decode_at(version);
        let cell = &p.memory[0x1000];

        // Present since version 0.
        assert_eq!(p.name, "old");
        assert_eq!(p.file_type, FileType::Sid);
        assert_eq!(p.input_bytes, [0x00, 0x10, 0x4c]);
        assert_eq!(cell.user_location.as_deref(), Some("play"));
        assert!(cell.is_inside);

        let has = |since: u8| version >= since;
        assert_eq!(
            p.target_type,
            if has(1) { TargetType::Vic20 } else { TargetType::C64 }
        );
        assert_eq!(cell.is_garbage, has(1));
        assert_eq!(
            cell.data_type,
            if has(1) { DataType::Address } else { DataType::None }
        );
        assert_eq!(p.chip, if has(2) { 3 } else { 0 });
        assert_eq!(cell.index, if has(3) { 9 } else { 0 });
        assert_eq!(p.constant.get(1, 1).is_some(), has(3));
        assert_eq!(p.relocates.len(), usize::from(has(4)));
        assert_eq!(p.patches.len(), usize::from(has(5)));
        assert_eq!(p.constant.get(1, 0x300).is_some(), has(6));
        assert_eq!(p.freezes.len(), usize::from(has(7)));
        assert_eq!(p.constant.get(11, 1).is_some(), has(8));
        assert_eq!(cell.related_address_base, if has(9) { 0x1000 } else { -1 });
        assert_eq!(cell.related_address_dest, if has(9) { 0x2000 } else { -1 });
        assert_eq!(
            cell.basic_type,
            if has(10) { BasicType::BasicV7_0 } else { BasicType::None }
        );
        assert_eq!(p.constant.comment(1, 1).is_some(), has(10));
        assert_eq!(p.bin_address, if has(11) { 0x1000 } else { 0 });
    }
}

#[test]
fn test_current_version_is_lossless() {
    assert_eq!(decode_at(CURRENT_VERSION), full_project());
}

/// A version 0 file assembled field by field.
#[test]
fn test_handcrafted_version_zero_stream() {
    let mut buf: Vec<u8> = Vec::new();
    buf.write_byte(0).unwrap();
    buf.write_string("legacy").unwrap();
    buf.write_string("a.prg").unwrap();
    buf.write_string("").unwrap();
    buf.write_name("PRG").unwrap();
    buf.write_byte_array(&[0x01, 0x08], "input bytes").unwrap();
    buf.write_byte_array(&[0, 0], "memory flags").unwrap();
    buf.write_length(MEMORY_SIZE, "memory").unwrap();
    for address in 0..MEMORY_SIZE as i32 {
        buf.write_int(address).unwrap();
        buf.write_nullable_string(None).unwrap();
        buf.write_nullable_string(None).unwrap();
        buf.write_nullable_string(None).unwrap();
        buf.write_nullable_string(None).unwrap();
        buf.write_nullable_string((address == 0x0801).then_some("start"))
            .unwrap();
        buf.write_bool(address == 0x0801).unwrap();
        buf.write_bool(false).unwrap();
        buf.write_bool(false).unwrap();
        buf.write_byte(0).unwrap();
        buf.write_int(-1).unwrap();
        buf.write_char(u16::from(b' ')).unwrap();
    }

    let project = decode(&buf).unwrap();
    assert_eq!(project.name, "legacy");
    assert_eq!(project.file_type, FileType::Prg);
    assert_eq!(project.target_type, TargetType::C64);
    assert_eq!(project.header_load_address(), Some(0x0801));
    assert_eq!(project.chip, 0);
    assert_eq!(project.bin_address, 0);
    assert!(project.relocates.is_empty());
    assert_eq!(project.constant.name_count(), 0);

    let cell = &project.memory[0x0801];
    assert_eq!(cell.user_location.as_deref(), Some("start"));
    assert!(cell.is_inside);
    assert!(!cell.is_garbage);
    assert_eq!(cell.data_type, DataType::None);
    assert_eq!(cell.related_address_base, -1);
    assert_eq!(cell.basic_type, BasicType::None);
}
