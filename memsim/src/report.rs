//! console output of a simulation run

use std::fmt::Write;

use crate::statistics::{Geometry, HitMiss, RunSummary, SlotSnapshot, StepRecord};

/// the slots a block of set `set_index` may live in
pub fn slot_range(set_index: u64, associativity: u64) -> String {
    let first = set_index * associativity;
    match associativity {
        1 => first.to_string(),
        2 => format!("{} or {}", first, first + 1),
        _ => format!("{} - {}", first, first + associativity - 1),
    }
}

/// `value` as a binary string of exactly `bits` digits
pub fn to_binary(value: u64, bits: u64) -> String {
    (0..bits)
        .rev()
        .map(|bit| if (value >> bit) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// print with at most `digits` significant digits and no trailing zeros
fn format_significant(value: f64, digits: usize) -> String {
    let int_digits = if value.abs() >= 1. {
        value.abs().log10().floor() as usize + 1
    } else {
        1
    };
    let decimals = digits.saturating_sub(int_digits);
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

pub fn format_geometry(geometry: &Geometry) -> String {
    let mut out = String::new();
    writeln!(out, "Total address lines required = {}", geometry.total_address_bits).ok();
    writeln!(out, "Number of bits for offset = {}", geometry.offset_bits).ok();
    writeln!(out, "Number of bits for index = {}", geometry.index_bits).ok();
    writeln!(out, "Number of bits for tag = {}", geometry.tag_bits).ok();
    writeln!(
        out,
        "Total cache size required = {} bytes",
        format_significant(geometry.total_footprint_bytes, 8)
    )
    .ok();
    out
}

pub fn format_steps(steps: &[StepRecord], associativity: u64) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "main memory address{:>12}{:>12}{:>12}{:>12}",
        "mm blk #", "cm set #", "cm blk #", "hit/miss"
    )
    .ok();
    writeln!(out, "{}", "-".repeat(67)).ok();
    for step in steps {
        let result = match step.result {
            HitMiss::Hit => "hit",
            HitMiss::Miss => "miss",
        };
        writeln!(
            out,
            "{:>11}{:>17}{:>12}{:>15}{:>10}",
            step.reference.address,
            step.memory_block_number,
            step.set_index,
            slot_range(step.set_index, associativity),
            result
        )
        .ok();
    }
    out
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Highest possible hit rate = {}/{} = {}%\nActual hit rate = {}/{} = {}%\n",
        summary.ideal_hit_count,
        summary.total_count,
        format_significant(summary.ideal_hit_rate(), 6),
        summary.hit_count,
        summary.total_count,
        format_significant(summary.hit_rate(), 6)
    )
}

pub fn format_cache_contents(slots: &[SlotSnapshot], tag_bits: u64) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "Cache blk #{:>12}{:>12}{:>10}{:>16}",
        "dirty bit", "valid bit", "tag", "Data"
    )
    .ok();
    writeln!(out, "{}", "-".repeat(67)).ok();
    for slot in slots {
        let (tag, data) = match (slot.valid, slot.tag, slot.block_number) {
            (true, Some(tag), Some(block)) => (to_binary(tag, tag_bits), format!("mm blk # {block}")),
            _ => ("x".repeat(tag_bits as usize), "?".to_string()),
        };
        writeln!(
            out,
            "{:>7}{:>12}{:>12}{:>15}{}{}",
            slot.slot_number,
            slot.dirty as u8,
            slot.valid as u8,
            tag,
            " ".repeat(8),
            data
        )
        .ok();
    }
    out
}
