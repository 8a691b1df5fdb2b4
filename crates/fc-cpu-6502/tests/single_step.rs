//! Table-driven single-instruction state tests.
//!
//! Each case gives a full initial CPU/RAM state, the expected state after
//! exactly one `execute`, and the expected cycle cost. The table lives
//! inline as JSON so the suite is self-contained.

use fc_core::{Bus, SimpleBus};
use fc_cpu_6502::{Cpu, Status};
use serde::Deserialize;

#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: u32,
}

#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(cpu: &mut Cpu, bus: &mut SimpleBus, state: &CpuState) {
    for &(addr, value) in &state.ram {
        bus.write(addr, value);
    }
    cpu.regs.pc = state.pc;
    cpu.regs.s = state.s;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status(state.p);
}

fn compare(cpu: &Cpu, bus: &SimpleBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    if cpu.regs.pc != expected.pc {
        errors.push(format!("PC: got ${:04X}, want ${:04X}", cpu.regs.pc, expected.pc));
    }
    if cpu.regs.s != expected.s {
        errors.push(format!("S: got ${:02X}, want ${:02X}", cpu.regs.s, expected.s));
    }
    if cpu.regs.a != expected.a {
        errors.push(format!("A: got ${:02X}, want ${:02X}", cpu.regs.a, expected.a));
    }
    if cpu.regs.x != expected.x {
        errors.push(format!("X: got ${:02X}, want ${:02X}", cpu.regs.x, expected.x));
    }
    if cpu.regs.y != expected.y {
        errors.push(format!("Y: got ${:02X}, want ${:02X}", cpu.regs.y, expected.y));
    }
    if cpu.regs.p.0 != expected.p {
        errors.push(format!("P: got ${:02X}, want ${:02X}", cpu.regs.p.0, expected.p));
    }
    for &(addr, value) in &expected.ram {
        let actual = bus.peek(addr);
        if actual != value {
            errors.push(format!("RAM[${addr:04X}]: got ${actual:02X}, want ${value:02X}"));
        }
    }
    errors
}

// Addresses and opcodes are decimal (JSON). Programs sit at $0200 (512)
// unless the case needs a specific page position.
const CASES: &str = r#"[
  {"name": "lda_immediate_sets_z",
   "initial": {"pc": 512, "s": 253, "a": 1, "x": 0, "y": 0, "p": 36,
               "ram": [[512, 169], [513, 0]]},
   "final":   {"pc": 514, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38, "ram": []},
   "cycles": 2},

  {"name": "adc_signed_overflow",
   "initial": {"pc": 512, "s": 253, "a": 80, "x": 0, "y": 0, "p": 36,
               "ram": [[512, 105], [513, 80]]},
   "final":   {"pc": 514, "s": 253, "a": 160, "x": 0, "y": 0, "p": 228, "ram": []},
   "cycles": 2},

  {"name": "sbc_with_carry_set",
   "initial": {"pc": 512, "s": 253, "a": 80, "x": 0, "y": 0, "p": 37,
               "ram": [[512, 233], [513, 16]]},
   "final":   {"pc": 514, "s": 253, "a": 64, "x": 0, "y": 0, "p": 37, "ram": []},
   "cycles": 2},

  {"name": "lda_absolute_x_page_cross",
   "initial": {"pc": 512, "s": 253, "a": 0, "x": 16, "y": 0, "p": 36,
               "ram": [[512, 189], [513, 248], [514, 3], [1032, 90]]},
   "final":   {"pc": 515, "s": 253, "a": 90, "x": 16, "y": 0, "p": 36, "ram": []},
   "cycles": 5},

  {"name": "sta_absolute_y_no_penalty",
   "initial": {"pc": 512, "s": 253, "a": 66, "x": 0, "y": 32, "p": 36,
               "ram": [[512, 153], [513, 240], [514, 3]]},
   "final":   {"pc": 515, "s": 253, "a": 66, "x": 0, "y": 32, "p": 36,
               "ram": [[1040, 66]]},
   "cycles": 5},

  {"name": "inc_zero_page_wraps_to_zero",
   "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36,
               "ram": [[512, 230], [513, 64], [64, 255]]},
   "final":   {"pc": 514, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38,
               "ram": [[64, 0]]},
   "cycles": 5},

  {"name": "jsr_pushes_return_minus_one",
   "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36,
               "ram": [[512, 32], [513, 0], [514, 3]]},
   "final":   {"pc": 768, "s": 251, "a": 0, "x": 0, "y": 0, "p": 36,
               "ram": [[509, 2], [508, 2]]},
   "cycles": 6},

  {"name": "ror_accumulator_rotates_carry_in",
   "initial": {"pc": 512, "s": 253, "a": 1, "x": 0, "y": 0, "p": 37,
               "ram": [[512, 106]]},
   "final":   {"pc": 513, "s": 253, "a": 128, "x": 0, "y": 0, "p": 165, "ram": []},
   "cycles": 2},

  {"name": "beq_taken_across_page",
   "initial": {"pc": 765, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38,
               "ram": [[765, 240], [766, 1]]},
   "final":   {"pc": 768, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38, "ram": []},
   "cycles": 4}
]"#;

#[test]
fn run_all() {
    let cases: Vec<TestCase> = serde_json::from_str(CASES).expect("case table parses");
    assert!(!cases.is_empty());

    for case in &cases {
        let mut cpu = Cpu::new();
        let mut bus = SimpleBus::new();
        setup(&mut cpu, &mut bus, &case.initial);

        let cycles = cpu
            .execute(&mut bus)
            .unwrap_or_else(|e| panic!("[{}] failed: {e}", case.name));
        assert_eq!(cycles, case.cycles, "[{}] cycle count", case.name);

        let errors = compare(&cpu, &bus, &case.final_state);
        assert!(errors.is_empty(), "[{}]: {}", case.name, errors.join(", "));
    }
}
