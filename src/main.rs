//! Circuitry - interactive diagram demos
//!
//! Builds one of a few bundled diagrams and drives it from stdin.
//!
//! # Usage
//!
//! ```bash
//! circuitry relay
//! ```
//!
//! Commands: `toggle NAME`, `press NAME`, `release NAME`,
//! `coil NAME on|off`, `show`, `quit`.

use std::io::{self, BufRead};

use clap::{Parser, ValueEnum};
use circuitry_core::{
    error::Result, DiagramBuilder, GateKind, RenderSink, SimConfig, Simulation,
};

/// Interactive circuit diagram simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bundled demo diagram to run
    #[arg(value_enum, default_value_t = Demo::Series)]
    demo: Demo,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Demo {
    /// Battery, two series switches, one bulb
    Series,
    /// Relay with a switched coil loop and two contact branches
    Relay,
    /// Half adder from buttons and gates, with a numeric readout
    Gates,
}

/// Prints every display update as it settles.
struct PrintSink;

impl RenderSink for PrintSink {
    fn component_changed(&mut self, name: &str, energized: bool) {
        println!("  {name} -> {}", if energized { "on" } else { "off" });
    }

    fn value_changed(&mut self, name: &str, value: u32) {
        println!("  {name} = {value}");
    }
}

fn build_demo(demo: Demo) -> Result<Simulation> {
    let mut b = DiagramBuilder::new();
    match demo {
        Demo::Series => {
            b.battery("battery")
                .switch("switch1", false)
                .switch("switch2", false)
                .light("bulb")
                .wire("w1", ("battery", "neg"), ("switch1", "left"))
                .wire("w2", ("switch1", "out"), ("switch2", "left"))
                .wire("w3", ("switch2", "out"), ("bulb", "left"))
                .wire("w4", ("bulb", "right"), ("battery", "pos"));
        }
        Demo::Relay => {
            b.battery("battery")
                .ground("ground")
                .switch("coilSwitch", false)
                .relay("relay")
                .battery("battery2")
                .ground("ground2")
                .light("idleBulb")
                .light("triggeredBulb")
                .wire("wCoil1", ("battery", "pos"), ("coilSwitch", "left"))
                .wire("wCoil2", ("coilSwitch", "out"), ("relay", "coilIn"))
                .wire("wCoil3", ("relay", "coilOut"), ("ground", ""))
                .wire("wPivot", ("battery2", "pos"), ("relay", "pivot"))
                .wire("wOut0", ("relay", "out0"), ("idleBulb", "left"))
                .wire("wOut1", ("relay", "out1"), ("triggeredBulb", "left"))
                .wire("wIdle", ("idleBulb", "right"), ("ground2", ""))
                .wire("wTrig", ("triggeredBulb", "right"), ("ground2", ""));
        }
        Demo::Gates => {
            b.latching_button("a", false)
                .latching_button("b", false)
                .gate("sum", GateKind::Xor)
                .gate("carry", GateKind::And)
                .bit_display("sumBit")
                .bit_display("carryBit")
                .wire("wa0", ("a", ""), ("sum", "in0"))
                .wire("wa1", ("a", ""), ("carry", "in0"))
                .wire("wb0", ("b", ""), ("sum", "in1"))
                .wire("wb1", ("b", ""), ("carry", "in1"))
                .wire("ws", ("sum", "out"), ("sumBit", ""))
                .wire("wc", ("carry", "out"), ("carryBit", ""))
                .tap("total", &[("sumBit", 0), ("carryBit", 1)]);
        }
    }
    b.build(SimConfig::default())
}

fn show(sim: &Simulation) {
    for (name, kind, energized) in sim.states() {
        println!("  {kind:<12} {name:<20} {}", if energized { "on" } else { "off" });
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut sim = build_demo(args.demo)?;
    sim.set_render_sink(Box::new(PrintSink));
    sim.refresh();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let outcome = match parts.as_slice() {
            [] => Ok(()),
            ["quit"] | ["exit"] => break,
            ["show"] => {
                show(&sim);
                Ok(())
            }
            ["toggle", name] => sim.toggle(name),
            ["press", name] => sim.press(name),
            ["release", name] => sim.release(name),
            ["coil", name, state @ ("on" | "off")] => sim.set_coil(name, *state == "on"),
            _ => {
                eprintln!("commands: toggle|press|release NAME, coil NAME on|off, show, quit");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            eprintln!("error: {e}");
        }
    }
    Ok(())
}
