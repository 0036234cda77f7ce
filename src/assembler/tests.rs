// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use proptest::prelude::*;

use super::output::render_listing;
use super::*;
use crate::core::expr::ExprCategory;
use crate::core::source::MemorySourceProvider;

fn assemble_with(options: AsmOptions, provider: MemorySourceProvider, source: &str) -> Assembly {
    Assembler::new(options, provider)
        .assemble_source("test.asm", source)
        .expect("assembly runs to completion")
}

fn assemble(source: &str) -> Assembly {
    assemble_with(AsmOptions::default(), MemorySourceProvider::new(), source)
}

fn relocatable(source: &str) -> Assembly {
    let options = AsmOptions {
        relocatable: true,
        ..AsmOptions::default()
    };
    assemble_with(options, MemorySourceProvider::new(), source)
}

fn bytes(assembly: &Assembly) -> Vec<u8> {
    assembly.image.entries().iter().map(|(_, b)| *b).collect()
}

fn has_error(assembly: &Assembly, flag: ErrorFlags) -> bool {
    assembly
        .diagnostics
        .iter()
        .any(|d| d.severity() == Severity::Error && d.code() == flag.code())
}

fn has_warning(assembly: &Assembly, flag: WarningFlags) -> bool {
    assembly
        .diagnostics
        .iter()
        .any(|d| d.severity() == Severity::Warning && d.code() == flag.code())
}

#[test]
fn assembles_a_small_program() {
    let asm = assemble(" ORG $1000\nSTART LDA #1\n BRA START\n END START\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(asm.image.entries()[0].0, 0x1000);
    assert_eq!(bytes(&asm), vec![0x86, 0x01, 0x20, 0xFC]);
    assert_eq!(asm.symbol_value("START"), Some(0x1000));
    assert_eq!(asm.transfer, Some(0x1000));
}

#[test]
fn local_labels_resolve_by_direction() {
    let asm = assemble(" ORG $100\n1 NOP\n BRA 1F\n BRA 1B\n1 NOP\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x12, 0x20, 0x02, 0x20, 0xFB, 0x12]);
}

#[test]
fn macro_parameters_are_substituted() {
    let source = "\
LOAD MACRO
 LDA #0&1
 ADDA #0&2
 ENDM
 ORG $2000
 LOAD 1,2
 LOAD 3
";
    let asm = assemble(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(
        bytes(&asm),
        vec![0x86, 0x01, 0x8B, 0x02, 0x86, 0x03, 0x8B, 0x00]
    );
}

#[test]
fn macro_label_parameter_suppresses_the_call_label() {
    let source = "\
NAMED MACRO
&0 FCB 1
 ENDM
 ORG $10
 NOP
HERE NAMED
";
    let asm = assemble(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(asm.symbol_value("HERE"), Some(0x11));
}

#[test]
fn macro_used_before_definition_is_rejected() {
    let asm = assemble(" LATER\nLATER MACRO\n NOP\n ENDM\n");
    assert!(has_error(&asm, ErrorFlags::ILLEGAL_MNEMONIC));
    assert_eq!(asm.error_count(), 1);
}

#[test]
fn unterminated_macro_is_a_nesting_error() {
    let asm = assemble("OPEN MACRO\n NOP\n");
    assert!(has_error(&asm, ErrorFlags::ILLEGAL_NESTING));
}

#[test]
fn short_branch_limits() {
    let fits = assemble(" ORG $1000\n BRA TARGET\n RMB 127\nTARGET NOP\n");
    assert_eq!(fits.error_count(), 0, "{:?}", fits.diagnostics);
    assert_eq!(&bytes(&fits)[..2], &[0x20, 0x7F]);

    let too_far = assemble(" ORG $1000\n BRA TARGET\n RMB 128\nTARGET NOP\n");
    assert!(has_error(&too_far, ErrorFlags::RANGE));

    let back = assemble(" ORG $1000\nTARGET RMB 126\n BRA TARGET\n");
    assert_eq!(back.error_count(), 0, "{:?}", back.diagnostics);
    assert_eq!(bytes(&back), vec![0x20, 0x80]);
}

#[test]
fn label_difference_is_a_constant() {
    let asm = relocatable("FIRST NOP\nSECOND NOP\nSIZE EQU SECOND-FIRST\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    let size = asm.symbol("SIZE").expect("SIZE");
    assert_eq!(size.category, SymbolCategory::Constant);
    assert_eq!(size.value, 1);
    let first = asm.symbol("FIRST").expect("FIRST");
    assert_eq!(first.category, SymbolCategory::Label);
}

#[test]
fn forward_equates_resolve_in_pass_two() {
    let asm = assemble(" ORG $10\nLATE EQU EARLY+1\nEARLY EQU 4\n FCB LATE\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x05]);
}

#[test]
fn data_directives() {
    let source = "\
 ORG $200
 FCB 1,\"AB\",$FF
 FDB $1234,-1
 FCDW $01020304
 FCC /HI/,13
 FCS \"OK\"
 RZB 2
 FILL $EE,2
";
    let asm = assemble(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(
        bytes(&asm),
        vec![
            0x01, 0x41, 0x42, 0xFF, 0x12, 0x34, 0xFF, 0xFF, 0x01, 0x02, 0x03, 0x04, 0x48, 0x49,
            0x0D, 0x4F, 0xCB, 0x00, 0x00, 0xEE, 0xEE,
        ]
    );
}

#[test]
fn byte_values_out_of_range_are_errors() {
    let asm = assemble(" FCB 256\n");
    assert!(has_error(&asm, ErrorFlags::RANGE));
}

#[test]
fn reservations_and_alignment_move_the_counter() {
    let asm = assemble(" ORG $300\n NOP\n ALIGN 4\nHERE NOP\nBUF RMD 2\nAFTER NOP\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(asm.symbol_value("HERE"), Some(0x304));
    assert_eq!(asm.symbol_value("BUF"), Some(0x305));
    assert_eq!(asm.symbol_value("AFTER"), Some(0x309));
    assert_eq!(bytes(&asm), vec![0x12, 0xFF, 0xFF, 0xFF, 0x12, 0x12]);
}

#[test]
fn set_variables_can_be_reassigned() {
    let asm = assemble("N SET 1\nN SET N+1\n FCB N\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x02]);
}

#[test]
fn redefined_label_is_reported() {
    let asm = assemble("TWICE NOP\nTWICE NOP\n");
    assert!(has_error(&asm, ErrorFlags::MULTIPLY_DEFINED));
}

#[test]
fn equ_needs_a_label() {
    let asm = assemble(" EQU 3\n");
    assert!(has_error(&asm, ErrorFlags::MISSING_LABEL));
}

#[test]
fn undefined_symbols_name_the_symbol() {
    let asm = assemble(" LDA MISSING\n");
    let diag = asm
        .diagnostics
        .iter()
        .find(|d| d.code() == ErrorFlags::UNDEFINED.code())
        .expect("undefined diagnostic");
    assert!(diag.message().contains("MISSING"));
    assert_eq!(diag.file(), Some("test.asm"));
}

#[test]
fn conditionals_select_blocks() {
    let source = "\
FLAG EQU 1
 IF FLAG
 FCB 1
 ELSE
 FCB 2
 ENDIF
 IFN FLAG
 FCB 3
 ENDC
 IFD FLAG
 FCB 4
 FIN
 IFND NOPE
 FCB 5
 ENDIF
 IFC \"abc\",abc
 FCB 6
 ENDIF
 IF FLAG-1,1
 FCB 7
 FCB 8
";
    let asm = assemble(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![1, 4, 5, 6, 8]);
}

#[test]
fn skip_count_form_inside_false_block_leaves_nesting_alone() {
    let asm = assemble(" IF 0\n IF 1,1\n NOP\n ENDIF\n NOP\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x12]);

    let asm = assemble("M MACRO\n IF 0\n IFN 0,1\n FCB 1\n ENDIF\n FCB 2\n ENDM\n M\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![2]);
}

#[test]
fn unbalanced_conditionals_are_nesting_errors() {
    assert!(has_error(&assemble(" ENDIF\n"), ErrorFlags::ILLEGAL_NESTING));
    assert!(has_error(&assemble(" IF 1\n NOP\n"), ErrorFlags::ILLEGAL_NESTING));
}

#[test]
fn dup_repeats_its_body() {
    let asm = assemble(" ORG $10\n DUP 3\n FCB $AA\n ENDD\n NOP\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0xAA, 0xAA, 0xAA, 0x12]);
}

#[test]
fn dup_count_must_be_in_range() {
    let asm = assemble(" DUP 0\n NOP\n ENDD\n");
    assert!(has_error(&asm, ErrorFlags::RANGE));
}

#[test]
fn includes_are_spliced_in_place() {
    let provider = MemorySourceProvider::new().with_file("defs.inc", "VALUE EQU $42\n");
    let asm = assemble_with(
        AsmOptions::default(),
        provider,
        " ORG $100\n INCLUDE \"defs.inc\"\n LDA #VALUE\n",
    );
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x86, 0x42]);
}

#[test]
fn missing_include_is_fatal() {
    let result = Assembler::new(AsmOptions::default(), MemorySourceProvider::new())
        .assemble_source("test.asm", " INCLUDE nothere.inc\n");
    assert!(matches!(result, Err(FatalError::Source { path, .. }) if path == "nothere.inc"));
}

#[test]
fn binary_files_become_hidden_data() {
    let provider = MemorySourceProvider::new().with_file("data.bin", vec![1u8, 2, 3]);
    let asm = assemble_with(
        AsmOptions::default(),
        provider,
        " ORG $10\n BINARY \"data.bin\"\n",
    );
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![1, 2, 3]);
    assert!(asm.listing.iter().all(|line| !line.source.contains("FCB")));
}

#[test]
fn opt_switches_the_cpu() {
    let asm = assemble(" OPT 6800\n NOP\n LDAA #1\n OPT 6811\n LDY #1\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x01, 0x86, 0x01, 0x18, 0xCE, 0x00, 0x01]);

    let wrong = assemble(" LDAA #1\n");
    assert!(has_error(&wrong, ErrorFlags::ILLEGAL_MNEMONIC));
}

#[test]
fn unknown_options_are_reported() {
    let asm = assemble(" OPT BOGUS\n");
    assert!(has_error(&asm, ErrorFlags::UNKNOWN_OPTION));
}

#[test]
fn split_accumulator_spelling_warns_on_6809() {
    let asm = assemble(" CLR A\n");
    assert_eq!(bytes(&asm), vec![0x4F]);
    assert!(has_warning(&asm, WarningFlags::AMBIGUOUS_MNEMONIC));

    let options = AsmOptions {
        cpu: crate::m6800::module::CPU_ID,
        ..AsmOptions::default()
    };
    let quiet = assemble_with(options, MemorySourceProvider::new(), " LDA A #2\n");
    assert_eq!(bytes(&quiet), vec![0x86, 0x02]);
    assert_eq!(quiet.warning_count(), 0);
}

#[test]
fn setdp_selects_direct_addressing() {
    let asm = assemble(" SETDP $20\n LDA $2010\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x96, 0x10]);

    let options = AsmOptions {
        cpu: crate::m6800::module::CPU_ID,
        ..AsmOptions::default()
    };
    let rejected = assemble_with(options, MemorySourceProvider::new(), " SETDP 0\n");
    assert!(has_error(&rejected, ErrorFlags::ILLEGAL_MNEMONIC));
}

#[test]
fn text_symbols_are_substituted() {
    let asm = assemble("CHAR TEXT \"$41\"\n FCB &CHAR\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x41]);
}

#[test]
fn escaped_text_name_in_macro_stays_literal() {
    let asm = assemble("NAME TEXT XYZ\nM MACRO\n FCC /\\&NAME/\n FCC /&NAME/\n ENDM\n M\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), b"&NAMEXYZ".to_vec());
}

#[test]
fn user_diagnostics_carry_their_text() {
    let asm = assemble(" ERROR custom failure\n WARNING heads up\n");
    assert_eq!(asm.error_count(), 1);
    assert_eq!(asm.warning_count(), 1);
    assert!(asm.diagnostics[0].message().contains("custom failure"));
}

#[test]
fn end_stops_the_pass() {
    let asm = assemble(" NOP\n END\n NOP\n");
    assert_eq!(bytes(&asm), vec![0x12]);
    assert_eq!(asm.transfer, None);
}

#[test]
fn reused_addresses_warn() {
    let asm = assemble(" ORG $10\n NOP\n ORG $10\n NOP\n");
    assert!(has_warning(&asm, WarningFlags::ADDRESS_REUSED));
    assert_eq!(asm.error_count(), 0);
}

#[test]
fn phase_changes_label_addresses_only() {
    let asm = assemble(" ORG $1000\n PHASE $8000\nTOP NOP\n DEPHASE\nBACK NOP\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(asm.symbol_value("TOP"), Some(0x8000));
    assert_eq!(asm.symbol_value("BACK"), Some(0x1001));
    assert_eq!(asm.image.entries()[0].0, 0x1000);
}

#[test]
fn relocatable_externals_produce_records() {
    let source = "\
 EXTERN OUTCH
 PUBLIC START
START JSR OUTCH
 LDX #START
";
    let asm = relocatable(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0xBD, 0x00, 0x00, 0x8E, 0x00, 0x00]);
    let relocations = asm.relocations();
    assert_eq!(relocations.len(), 2);
    assert_eq!(relocations[0].address, 1);
    assert_eq!(relocations[0].symbol.as_deref(), Some("OUTCH"));
    assert!(relocations[0].category.contains(ExprCategory::EXTERNAL));
    assert_eq!(relocations[1].address, 4);
    assert!(relocations[1].category.contains(ExprCategory::INTERNAL));
    assert!(relocations[1].symbol.is_none());
}

#[test]
fn relocatable_mode_rejects_org() {
    let asm = relocatable(" ORG $100\n");
    assert!(has_error(&asm, ErrorFlags::RELOCATION_MODE));
    let absolute = assemble(" EXTERN THING\n");
    assert!(has_error(&absolute, ErrorFlags::RELOCATION_MODE));
}

#[test]
fn undefined_symbols_can_become_external() {
    let options = AsmOptions {
        relocatable: true,
        undef_extern: true,
        ..AsmOptions::default()
    };
    let asm = assemble_with(options, MemorySourceProvider::new(), " JSR FAR\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(asm.relocations()[0].symbol.as_deref(), Some("FAR"));
}

#[test]
fn common_members_relocate_against_the_block() {
    let source = "\
BLK COMMON
F1 RMB 2
F2 RMB 1
 ENDCOM
 LDX #F2
";
    let asm = relocatable(source);
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
    assert_eq!(bytes(&asm), vec![0x8E, 0x00, 0x02]);
    assert_eq!(asm.symbol_value("BLK"), Some(3));
    assert_eq!(asm.relocations()[0].symbol.as_deref(), Some("BLK"));
}

#[test]
fn public_without_definition_is_undefined() {
    let asm = relocatable(" PUBLIC GHOST\n NOP\n");
    assert!(has_error(&asm, ErrorFlags::UNDEFINED));
}

#[test]
fn listing_includes_symbols_and_totals() {
    let asm = assemble(" ORG $1000\nSTART LDA #1\nVAL EQU $55\n");
    let mut out = Vec::new();
    render_listing(&mut out, &asm, true).expect("render");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("1000  86 01"));
    assert!(text.contains("= 0055"));
    assert!(text.contains("SYMBOL TABLE"));
    assert!(text.contains("START"));
    assert!(text.contains("Errors: 0"));
    assert!(!text.contains("Transfer address"));
}

#[test]
fn listing_names_the_transfer_label() {
    let asm = assemble(" ORG $1000\nSTART NOP\n END START\n");
    let mut out = Vec::new();
    render_listing(&mut out, &asm, false).expect("render");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Transfer address: 1000 (START)"));
}

#[test]
fn case_folds_unless_strict() {
    let asm = assemble("Start NOP\n BRA start\n");
    assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);

    let options = AsmOptions {
        strict: true,
        ..AsmOptions::default()
    };
    let strict = assemble_with(options, MemorySourceProvider::new(), "Start NOP\n BRA start\n");
    assert!(has_error(&strict, ErrorFlags::UNDEFINED));
}

#[derive(Debug, Clone)]
enum Stmt {
    Nop,
    LoadA(u8),
    LoadX(u16),
    Reserve(u16),
    Bytes(u8),
    Jump(usize),
}

impl Stmt {
    fn size(&self) -> u16 {
        match self {
            Stmt::Nop => 1,
            Stmt::LoadA(_) => 2,
            Stmt::LoadX(_) | Stmt::Jump(_) => 3,
            Stmt::Reserve(n) => *n,
            Stmt::Bytes(n) => *n as u16,
        }
    }

    fn render(&self, labels: usize) -> String {
        match self {
            Stmt::Nop => "NOP".to_string(),
            Stmt::LoadA(n) => format!("LDA #{n}"),
            Stmt::LoadX(n) => format!("LDX #${n:04X}"),
            Stmt::Reserve(n) => format!("RMB {n}"),
            Stmt::Bytes(n) => format!("FCB {}", vec!["7"; *n as usize].join(",")),
            Stmt::Jump(target) => format!("JMP L{}", target % labels),
        }
    }
}

fn stmt_strategy() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        Just(Stmt::Nop),
        any::<u8>().prop_map(Stmt::LoadA),
        any::<u16>().prop_map(Stmt::LoadX),
        (1u16..=32).prop_map(Stmt::Reserve),
        (1u8..=4).prop_map(Stmt::Bytes),
        (0usize..64).prop_map(Stmt::Jump),
    ]
}

proptest! {
    #[test]
    fn label_addresses_follow_instruction_sizes(
        program in proptest::collection::vec(stmt_strategy(), 1..40)
    ) {
        let mut source = String::from(" ORG $1000\n");
        for (idx, stmt) in program.iter().enumerate() {
            source.push_str(&format!("L{idx} {}\n", stmt.render(program.len())));
        }
        let asm = assemble(&source);
        prop_assert_eq!(asm.error_count(), 0, "{:?}", asm.diagnostics);
        let mut address = 0x1000u16;
        for (idx, stmt) in program.iter().enumerate() {
            prop_assert_eq!(asm.symbol_value(&format!("L{idx}")), Some(address));
            address += stmt.size();
        }
    }
}
