//! AIGER codec: ASCII (`aag`) and binary (`aig`) formats.
//!
//! Only combinational AIGER is supported (latch count must be zero);
//! sequential circuits are out of scope for this crate. The binary format
//! encodes each gate's two fanin deltas (`d0 = lhs - rhs0`, `d1 = rhs0 -
//! rhs1`, with `rhs0 >= rhs1`) as base-128 varints, least-significant
//! group first, continuation bit in the high bit of each byte.

use crate::error::{AigError, AigResult};
use crate::graph::{Graph, Lit, NodeId};

fn encode_varint(mut x: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (x & 0x7f) as u8;
        x >>= 7;
        if x != 0 {
            out.push(byte | 0x80);
        } else {
            out.push(byte);
            break;
        }
    }
}

fn decode_varint(bytes: &[u8], pos: &mut usize) -> AigResult<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        let &byte = bytes.get(*pos).ok_or_else(|| AigError::Malformed {
            context: "truncated varint in binary gate section".into(),
        })?;
        *pos += 1;
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    Ok(result)
}

struct VarMap {
    // AIGER var index -> the internal literal that represents that var's
    // positive reference. Index 0 is always the constant.
    map: Vec<Lit>,
}

impl VarMap {
    fn new(capacity: usize) -> Self {
        VarMap {
            map: vec![Lit::FALSE; capacity],
        }
    }

    fn set(&mut self, var: u32, lit: Lit) {
        self.map[var as usize] = lit;
    }

    fn resolve(&self, aiger_lit: u32) -> Lit {
        let var = aiger_lit >> 1;
        let inv = aiger_lit & 1 == 1;
        let base = self.map[var as usize];
        if inv {
            base.negate()
        } else {
            base
        }
    }
}

struct Header {
    binary: bool,
    m: usize,
    i: usize,
    l: usize,
    o: usize,
    a: usize,
}

fn parse_header(line: &str) -> AigResult<Header> {
    let mut parts = line.split_whitespace();
    let magic = parts.next().ok_or_else(|| AigError::Malformed {
        context: "empty AIGER header".into(),
    })?;
    let binary = match magic {
        "aag" => false,
        "aig" => true,
        other => {
            return Err(AigError::Malformed {
                context: format!("unrecognized AIGER magic '{other}'"),
            })
        }
    };
    let mut nums = [0usize; 5];
    for slot in &mut nums {
        *slot = parts
            .next()
            .ok_or_else(|| AigError::Malformed {
                context: "AIGER header missing a field".into(),
            })?
            .parse()
            .map_err(|_| AigError::Malformed {
                context: "AIGER header field is not a number".into(),
            })?;
    }
    Ok(Header {
        binary,
        m: nums[0],
        i: nums[1],
        l: nums[2],
        o: nums[3],
        a: nums[4],
    })
}

/// Parse an AIGER file (ASCII or binary, detected from the magic word) into
/// a [`Graph`].
pub fn read_aiger(data: &[u8]) -> AigResult<Graph> {
    let header_end = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| AigError::Malformed {
            context: "no header line".into(),
        })?;
    let header_line = std::str::from_utf8(&data[..header_end]).map_err(|_| AigError::Malformed {
        context: "header is not valid UTF-8".into(),
    })?;
    let header = parse_header(header_line)?;
    if header.l != 0 {
        return Err(AigError::Sequential { latches: header.l });
    }
    if header.m != header.i + header.a {
        return Err(AigError::Malformed {
            context: format!(
                "M ({}) does not equal I+A ({})",
                header.m,
                header.i + header.a
            ),
        });
    }

    let mut graph = Graph::new(header.i);
    let mut map = VarMap::new(header.m + 1);
    for v in 1..=header.i {
        map.set(v as u32, Lit::new(NodeId(v as u32), false));
    }

    let rest = &data[header_end + 1..];
    if header.binary {
        read_binary_body(rest, &header, &mut graph, &mut map)
    } else {
        read_ascii_body(rest, &header, &mut graph, &mut map)
    }
}

fn read_ascii_body(
    rest: &[u8],
    header: &Header,
    graph: &mut Graph,
    map: &mut VarMap,
) -> AigResult<()> {
    let text = std::str::from_utf8(rest).map_err(|_| AigError::Malformed {
        context: "body is not valid UTF-8".into(),
    })?;
    let mut lines = text.lines();
    let parse_num = |s: &str| -> AigResult<u32> {
        s.trim().parse().map_err(|_| AigError::Malformed {
            context: format!("expected a literal, found '{s}'"),
        })
    };

    // PI lines are informational in the ascii format (PIs are vars 1..I by
    // convention); read and discard, they already match `map`'s identity
    // seeding above.
    for _ in 0..header.i {
        lines.next().ok_or_else(|| AigError::Malformed {
            context: "truncated PI section".into(),
        })?;
    }

    let mut output_lits = Vec::with_capacity(header.o);
    for _ in 0..header.o {
        let line = lines.next().ok_or_else(|| AigError::Malformed {
            context: "truncated output section".into(),
        })?;
        output_lits.push(parse_num(line)?);
    }

    for g in 0..header.a {
        let line = lines.next().ok_or_else(|| AigError::Malformed {
            context: "truncated gate section".into(),
        })?;
        let mut tok = line.split_whitespace();
        let lhs = parse_num(tok.next().ok_or_else(|| AigError::Malformed {
            context: "gate line missing lhs".into(),
        })?)?;
        let r0 = parse_num(tok.next().ok_or_else(|| AigError::Malformed {
            context: "gate line missing rhs0".into(),
        })?)?;
        let r1 = parse_num(tok.next().ok_or_else(|| AigError::Malformed {
            context: "gate line missing rhs1".into(),
        })?)?;
        let var = lhs >> 1;
        if var as usize != header.i + g + 1 {
            return Err(AigError::Malformed {
                context: format!("gate {g} has unexpected lhs variable {var}"),
            });
        }
        let f0 = map.resolve(r0);
        let f1 = map.resolve(r1);
        let result = graph.create_and(f0, f1);
        map.set(var, result);
    }

    for lit in output_lits {
        graph.add_output(map.resolve(lit));
    }
    Ok(())
}

fn read_binary_body(
    rest: &[u8],
    header: &Header,
    graph: &mut Graph,
    map: &mut VarMap,
) -> AigResult<()> {
    // Output literals are still plain ASCII lines, one per output, before
    // the binary-encoded gate section begins.
    let mut split_at = 0;
    let mut output_lits = Vec::with_capacity(header.o);
    if header.o > 0 {
        let text_guess = std::str::from_utf8(rest).unwrap_or("");
        let mut line_start = 0;
        let mut lines_read = 0;
        for (idx, ch) in text_guess.char_indices() {
            if ch == '\n' {
                let line = &text_guess[line_start..idx];
                output_lits.push(line.trim().parse::<u32>().map_err(|_| AigError::Malformed {
                    context: format!("expected output literal, found '{line}'"),
                })?);
                line_start = idx + 1;
                lines_read += 1;
                if lines_read == header.o {
                    split_at = line_start;
                    break;
                }
            }
        }
        if lines_read != header.o {
            return Err(AigError::Malformed {
                context: "truncated output section".into(),
            });
        }
    }

    let gate_bytes = &rest[split_at..];
    let mut pos = 0usize;
    for g in 0..header.a {
        let var = (header.i + g + 1) as u32;
        let lhs = var * 2;
        let d0 = decode_varint(gate_bytes, &mut pos)?;
        let d1 = decode_varint(gate_bytes, &mut pos)?;
        let r0 = u64::from(lhs)
            .checked_sub(d0)
            .ok_or_else(|| AigError::Malformed {
                context: format!("gate {g} delta0 underflows lhs"),
            })?;
        let r1 = r0.checked_sub(d1).ok_or_else(|| AigError::Malformed {
            context: format!("gate {g} delta1 underflows rhs0"),
        })?;
        let f0 = map.resolve(r0 as u32);
        let f1 = map.resolve(r1 as u32);
        let result = graph.create_and(f0, f1);
        map.set(var, result);
    }

    for lit in output_lits {
        graph.add_output(map.resolve(lit));
    }
    Ok(())
}

/// Build a dense AIGER variable numbering for every live node, mapping
/// original [`NodeId`]s to `1..=M` in topological (creation) order.
fn renumber(graph: &Graph) -> (Vec<u32>, Vec<NodeId>) {
    let mut remap = vec![0u32; graph.num_vars()];
    let mut gates = Vec::new();
    let mut next = graph.num_pis() as u32 + 1;
    for id in graph.var_ids() {
        if id.0 == 0 {
            continue;
        }
        if graph.is_pi(id) {
            remap[id.0 as usize] = id.0;
            continue;
        }
        if graph.is_dead(id) {
            continue;
        }
        remap[id.0 as usize] = next;
        next += 1;
        gates.push(id);
    }
    (remap, gates)
}

fn remap_lit(remap: &[u32], lit: Lit) -> u32 {
    let new_var = remap[lit.var().0 as usize];
    (new_var << 1) | u32::from(lit.is_inverted())
}

/// Serialize a graph to ASCII AIGER (`aag`) text.
#[must_use]
pub fn write_ascii(graph: &Graph) -> String {
    use std::fmt::Write;
    let (remap, gates) = renumber(graph);
    let m = graph.num_pis() + gates.len();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "aag {} {} 0 {} {}",
        m,
        graph.num_pis(),
        graph.num_pos(),
        gates.len()
    );
    for i in 1..=graph.num_pis() {
        let _ = writeln!(out, "{}", i * 2);
    }
    for &o in &graph.outputs {
        let _ = writeln!(out, "{}", remap_lit(&remap, o));
    }
    for id in gates {
        let node = graph.node(id);
        let lhs = remap[id.0 as usize] * 2;
        let mut r0 = remap_lit(&remap, node.fanin0);
        let mut r1 = remap_lit(&remap, node.fanin1);
        if r0 < r1 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let _ = writeln!(out, "{lhs} {r0} {r1}");
    }
    out
}

/// Serialize a graph to binary AIGER (`aig`) bytes.
#[must_use]
pub fn write_binary(graph: &Graph) -> Vec<u8> {
    let (remap, gates) = renumber(graph);
    let m = graph.num_pis() + gates.len();
    let mut out = Vec::new();
    out.extend_from_slice(
        format!(
            "aig {} {} 0 {} {}\n",
            m,
            graph.num_pis(),
            graph.num_pos(),
            gates.len()
        )
        .as_bytes(),
    );
    for &o in &graph.outputs {
        out.extend_from_slice(format!("{}\n", remap_lit(&remap, o)).as_bytes());
    }
    for id in gates {
        let node = graph.node(id);
        let lhs = remap[id.0 as usize] * 2;
        let mut r0 = remap_lit(&remap, node.fanin0);
        let mut r1 = remap_lit(&remap, node.fanin1);
        if r0 < r1 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let d0 = u64::from(lhs - r0);
        let d1 = u64::from(r0 - r1);
        encode_varint(d0, &mut out);
        encode_varint(d1, &mut out);
    }
    out
}
