use asm::assemble;
use asm::file_reader::MockFileReader;
use std::path::Path;

#[test]
fn assembles_program_with_loop_label_and_variable() {
    // Sums 1..=100 into RAM[0], using a variable `i` and a backward jump.
    let source = "\
@i
M=0
@sum
M=0
(LOOP)
@i
D=M
@100
D=D-A
@END
D;JGT
@i
D=M
@sum
M=D+M
@i
M=M+1
@LOOP
0;JMP
(END)
@sum
D=M
@0
M=D
";
    let mut reader = MockFileReader::default();
    reader.add_file("sum.asm", source);

    let code = assemble(Path::new("sum.asm"), &reader).unwrap();

    // 22 real instructions; the two label declarations contribute no ROM words.
    assert_eq!(code.len(), 22);
    for line in &code {
        assert_eq!(line.len(), 16);
        assert!(line.chars().all(|c| c == '0' || c == '1'));
    }
}

#[test]
fn rejects_duplicate_label_definitions() {
    let mut reader = MockFileReader::default();
    reader.add_file("bad.asm", "(LOOP)\n@0\n(LOOP)\n@1\n");

    let result = assemble(Path::new("bad.asm"), &reader);
    assert!(result.is_err());
}

#[test]
fn rejects_malformed_c_instruction_field() {
    let mut reader = MockFileReader::default();
    // `D+D` is not a valid comp field.
    reader.add_file("bad.asm", "D=D+D\n");

    let result = assemble(Path::new("bad.asm"), &reader);
    assert!(result.is_err());
}

#[test]
fn predefined_registers_resolve_without_allocating_ram() {
    let mut reader = MockFileReader::default();
    reader.add_file("ptrs.asm", "@SP\n@LCL\n@ARG\n@THIS\n@THAT\n@R2\n@SCREEN\n@KBD\n");

    let code = assemble(Path::new("ptrs.asm"), &reader).unwrap();
    assert_eq!(code[0], "0000000000000000"); // SP = 0
    assert_eq!(code[1], "0000000000000001"); // LCL = 1
    assert_eq!(code[5], "0000000000000010"); // R2 = 2
    assert_eq!(code[6], "0100000000000000"); // SCREEN = 16384
    assert_eq!(code[7], "0110000000000000"); // KBD = 24576
}

#[test]
fn address_literal_over_max_addressable_memory_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("bad.asm", "@40000\n");

    let result = assemble(Path::new("bad.asm"), &reader);
    assert!(result.is_err());
}

#[test]
fn missing_source_file_produces_error() {
    let reader = MockFileReader::default();
    let result = assemble(Path::new("nope.asm"), &reader);
    assert!(result.is_err());
}
