//! End-to-end system tests on in-memory NROM images.

use std::cell::RefCell;
use std::rc::Rc;

use fc_core::Bus;
use fc_cpu_6502::{CpuError, State, TraceEvent, TraceSink};
use fc_machine::Nes;

/// Build a 32K NROM iNES image with the given code at $8000 and vectors.
fn build_image(code: &[u8], nmi: u16, reset: u16) -> Vec<u8> {
    let mut prg = vec![0xEA; 32768]; // NOP filler
    prg[..code.len()].copy_from_slice(code);
    prg[0x7FFA] = nmi as u8;
    prg[0x7FFB] = (nmi >> 8) as u8;
    prg[0x7FFC] = reset as u8;
    prg[0x7FFD] = (reset >> 8) as u8;

    let mut image = vec![0u8; 16];
    image[0..4].copy_from_slice(b"NES\x1a");
    image[4] = 2; // 32K PRG
    image[5] = 1; // 8K CHR
    image.extend_from_slice(&prg);
    image.extend_from_slice(&[0; 8192]);
    image
}

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for SharedSink {
    fn record(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn nmi_fires_once_per_frame() {
    let code = [
        0xA9, 0x80, // LDA #$80
        0x8D, 0x00, 0x20, // STA $2000 (enable VBlank NMI)
        0x4C, 0x05, 0x80, // JMP $8005 (spin)
    ];
    let mut handler_image = build_image(&code, 0x9000, 0x8000);
    // NMI handler at $9000: INC $10; RTI
    let prg_base = 16;
    handler_image[prg_base + 0x1000] = 0xE6;
    handler_image[prg_base + 0x1001] = 0x10;
    handler_image[prg_base + 0x1002] = 0x40;

    let mut nes = Nes::from_ines(&handler_image).expect("valid image");
    nes.run_frame().expect("frame 1");
    assert_eq!(nes.bus().peek(0x0010), 1, "one NMI in the first frame");
    nes.run_frame().expect("frame 2");
    assert_eq!(nes.bus().peek(0x0010), 2, "one NMI per frame");
}

#[test]
fn oam_dma_stalls_the_cpu() {
    let code = [
        0xA9, 0x02, // LDA #$02
        0x8D, 0x14, 0x40, // STA $4014
        0xEA, // NOP
    ];
    let image = build_image(&code, 0x9000, 0x8000);
    let mut nes = Nes::from_ines(&image).expect("valid image");

    assert_eq!(nes.step().expect("LDA"), 2);
    assert_eq!(nes.step().expect("STA"), 4);
    assert_eq!(nes.step().expect("stall"), 513, "DMA stall is constant");
    assert_eq!(nes.step().expect("NOP"), 2, "execution resumes");
}

#[test]
fn unknown_opcode_stops_the_machine() {
    let code = [0x02]; // JAM
    let image = build_image(&code, 0x9000, 0x8000);
    let mut nes = Nes::from_ines(&image).expect("valid image");

    let err = nes.step();
    assert_eq!(
        err,
        Err(CpuError::UnknownOpcode {
            opcode: 0x02,
            pc: 0x8000
        })
    );
    assert_eq!(nes.cpu().state(), State::Error);
    // The frame loop no longer advances.
    assert_eq!(nes.run_frame().expect("terminal state is quiet"), 0);
}

#[test]
fn trace_matches_hand_computed_state() {
    let code = [
        0xA2, 0x05, // $8000 LDX #$05
        0xCA, // $8002 DEX
        0xD0, 0xFD, // $8003 BNE $8002
    ];
    let image = build_image(&code, 0x9000, 0x8000);
    let mut nes = Nes::from_ines(&image).expect("valid image");
    let sink = SharedSink::default();
    nes.set_trace_sink(Box::new(sink.clone()));

    for _ in 0..5 {
        nes.step().expect("step");
    }

    let events = sink.0.borrow();
    // (pc, mnemonic, x, p, cycles) before each instruction.
    let expected = [
        (0x8000, "LDX", 0x00, 0x24, 0),
        (0x8002, "DEX", 0x05, 0x24, 2),
        (0x8003, "BNE", 0x04, 0x24, 4),
        (0x8002, "DEX", 0x04, 0x24, 7), // branch taken, same page: 3 cycles
        (0x8003, "BNE", 0x03, 0x24, 9),
    ];
    assert_eq!(events.len(), expected.len());
    for (event, &(pc, mnemonic, x, p, cycles)) in events.iter().zip(&expected) {
        assert_eq!(event.pc, pc, "pc before {mnemonic}");
        assert_eq!(event.mnemonic, mnemonic);
        assert_eq!(event.x, x, "X before {mnemonic} at ${pc:04X}");
        assert_eq!(event.p, p);
        assert_eq!(event.cycles, cycles);
        assert_eq!(event.a, 0);
        assert_eq!(event.y, 0);
        assert_eq!(event.s, 0xFD);
    }

    assert_eq!(
        events[0].to_string(),
        "8000  A2  LDX  A:00 X:00 Y:00 P:24 SP:FD CYC:0"
    );
}

#[test]
fn tracing_does_not_perturb_execution() {
    let code = [
        0xA2, 0x05, // LDX #$05
        0xCA, // DEX
        0xD0, 0xFD, // BNE
    ];
    let image = build_image(&code, 0x9000, 0x8000);

    let mut traced = Nes::from_ines(&image).expect("valid image");
    traced.set_trace_sink(Box::new(SharedSink::default()));
    let mut plain = Nes::from_ines(&image).expect("valid image");

    for _ in 0..20 {
        let a = traced.step().expect("traced");
        let b = plain.step().expect("plain");
        assert_eq!(a, b, "cycle counts diverged");
    }
    assert_eq!(traced.cpu().regs, plain.cpu().regs);
    assert_eq!(traced.bus().ppu.dot(), plain.bus().ppu.dot());
    assert_eq!(traced.bus().ppu.scanline(), plain.bus().ppu.scanline());
}
