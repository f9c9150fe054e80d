//! Signature decoding.
//!
//! A 3x3x3 bandaged cube is encoded either as a 54-bit hex signature, one
//! bit per possible internal face-to-face connection, or as an explicit
//! list of 27 group labels. Decoding a hex signature reconstructs the
//! bandage groups as connected components of the live connections.

use std::collections::HashMap;

use crate::cube::Cube;
use crate::error::{GrapherError, Result};

/// Number of possible internal connections of a 3x3x3 cube, one per
/// signature bit.
pub const SIGNATURE_BITS: usize = 54;

/// Hex signatures always describe a 3x3x3 cube.
const DECODE_ORDER: usize = 3;

/// Volumetric cubie coordinate (axis 0, axis 1, axis 2).
pub type CubieCoord = (usize, usize, usize);

/// The fixed adjacency template: 54 cubie pairs, one per signature bit, in
/// the canonical bit order.
///
/// For every layer along axis 0: the two horizontal pairs of the back row,
/// then per axis-1 step the three column pairs and two row pairs, then the
/// nine pairs connecting into the next layer.
pub fn adjacency_template() -> Vec<(CubieCoord, CubieCoord)> {
    let mut conn = Vec::with_capacity(SIGNATURE_BITS);
    for z in 0..3 {
        conn.push(((z, 0, 0), (z, 0, 1)));
        conn.push(((z, 0, 1), (z, 0, 2)));
        for y in 0..2 {
            conn.push(((z, y, 0), (z, y + 1, 0)));
            conn.push(((z, y, 1), (z, y + 1, 1)));
            conn.push(((z, y, 2), (z, y + 1, 2)));
            conn.push(((z, y + 1, 0), (z, y + 1, 1)));
            conn.push(((z, y + 1, 1), (z, y + 1, 2)));
        }
        if z < 2 {
            for m in 0..9 {
                conn.push(((z, m / 3, m % 3), (z + 1, m / 3, m % 3)));
            }
        }
    }
    conn
}

fn flatten(coord: CubieCoord) -> usize {
    let n = DECODE_ORDER;
    coord.0 * n * n + coord.1 * n + coord.2
}

fn invalid(signature: &str, reason: &'static str) -> GrapherError {
    GrapherError::InvalidSignature {
        signature: signature.to_string(),
        reason,
    }
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Decode a hex signature into a labeled 3x3x3 cube.
///
/// Bit `k` of the MSB-first, zero-padded 54-bit rendering of the value
/// enables template pair `k`. Bandage groups are the connected components
/// of the live connections. Component labels are deterministic: components
/// are numbered 1.. in ascending order of the lowest flattened cubie index
/// they touch. Cubies touched by no live connection keep label 0.
pub fn decode_hex(signature: &str) -> Result<Cube> {
    let trimmed = signature.trim();
    let value = u64::from_str_radix(trimmed, 16)
        .map_err(|_| invalid(trimmed, "not a hexadecimal number"))?;
    if value >> SIGNATURE_BITS != 0 {
        return Err(invalid(trimmed, "signature too large, more than 54 bits"));
    }

    let cell_count = DECODE_ORDER * DECODE_ORDER * DECODE_ORDER;
    let mut groups = DisjointSet::new(cell_count);
    let mut touched = vec![false; cell_count];
    for (k, &(a, b)) in adjacency_template().iter().enumerate() {
        if (value >> (SIGNATURE_BITS - 1 - k)) & 1 == 1 {
            let (ia, ib) = (flatten(a), flatten(b));
            groups.union(ia, ib);
            touched[ia] = true;
            touched[ib] = true;
        }
    }

    let mut labels_by_root: HashMap<usize, u32> = HashMap::new();
    let mut cells = vec![0u32; cell_count];
    for (i, cell) in cells.iter_mut().enumerate() {
        if touched[i] {
            let root = groups.find(i);
            let next = labels_by_root.len() as u32 + 1;
            *cell = *labels_by_root.entry(root).or_insert(next);
        }
    }

    Cube::new(DECODE_ORDER, cells)
}

fn split_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| c == '.' || c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Decode an explicit label list into a 3x3x3 cube.
///
/// Tokens may be separated by any run of `.`, `,`, `;` or whitespace.
/// Exactly 27 integer tokens are required.
pub fn decode_list(text: &str) -> Result<Cube> {
    let tokens = split_tokens(text);
    if tokens.len() != DECODE_ORDER * DECODE_ORDER * DECODE_ORDER {
        return Err(invalid(text, "expected exactly 27 cubie labels"));
    }
    let cells = tokens
        .iter()
        .map(|t| {
            t.parse::<u32>()
                .map_err(|_| invalid(text, "cubie label is not an integer"))
        })
        .collect::<Result<Vec<_>>>()?;
    Cube::new(DECODE_ORDER, cells)
}

/// Detect the signature format and decode it.
///
/// A 27-token input is treated as a label list, a single token as a hex
/// signature; anything else is rejected.
pub fn decode_auto(text: &str) -> Result<Cube> {
    let trimmed = text.trim();
    let tokens = split_tokens(trimmed);
    match tokens.len() {
        27 => decode_list(trimmed),
        1 => decode_hex(tokens[0]),
        _ => Err(invalid(trimmed, "unrecognized cube signature format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// All 54 bits set.
    const FULL: &str = "3FFFFFFFFFFFFF";

    #[test]
    fn template_has_54_adjacent_pairs() {
        let template = adjacency_template();
        assert_eq!(template.len(), SIGNATURE_BITS);
        let mut seen = HashSet::new();
        for &(a, b) in &template {
            // Each pair joins face-adjacent cubies exactly once.
            let dist = a.0.abs_diff(b.0) + a.1.abs_diff(b.1) + a.2.abs_diff(b.2);
            assert_eq!(dist, 1, "{a:?} {b:?}");
            assert!(seen.insert((a.min(b), a.max(b))));
        }
    }

    #[test]
    fn zero_signature_is_fully_unbandaged() {
        let cube = decode_hex("0").unwrap();
        assert!(cube.cells().iter().all(|&c| c == 0));
        let padded = decode_hex("0000000000000").unwrap();
        assert_eq!(cube, padded);
    }

    #[test]
    fn full_signature_is_one_block() {
        let cube = decode_hex(FULL).unwrap();
        assert!(cube.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn too_large_signature_is_rejected() {
        // 1 << 54 needs a 55th bit.
        assert!(decode_hex("40000000000000").is_err());
        // Unparseable as u64 at all.
        assert!(decode_hex("FFFFFFFFFFFFFFFFFF").is_err());
        assert!(decode_hex("not-hex").is_err());
        assert!(decode_hex("").is_err());
    }

    #[test]
    fn decoding_is_deterministic() {
        let a = decode_hex("33EC01800846").unwrap();
        let b = decode_hex("33EC01800846").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decoded_groups_match_live_connectivity() {
        let signature = "33EC01800846";
        let cube = decode_hex(signature).unwrap();
        let value = u64::from_str_radix(signature, 16).unwrap();

        // Collect live connections straight from the bit string.
        let live: Vec<(usize, usize)> = adjacency_template()
            .iter()
            .enumerate()
            .filter(|&(k, _)| (value >> (SIGNATURE_BITS - 1 - k)) & 1 == 1)
            .map(|(_, &(a, b))| (flatten(a), flatten(b)))
            .collect();

        // A label-0 cubie has no live connection.
        for &(a, b) in &live {
            assert_ne!(cube.cells()[a], 0);
            assert_ne!(cube.cells()[b], 0);
            // No live connection joins two different groups.
            assert_eq!(cube.cells()[a], cube.cells()[b]);
        }

        // The number of distinct nonzero labels equals the number of
        // connected components of the live subgraph.
        let mut adj: HashMap<usize, Vec<usize>> = HashMap::new();
        for &(a, b) in &live {
            adj.entry(a).or_default().push(b);
            adj.entry(b).or_default().push(a);
        }
        let mut visited = HashSet::new();
        let mut components = 0;
        for &start in adj.keys() {
            if !visited.insert(start) {
                continue;
            }
            components += 1;
            let mut queue = vec![start];
            while let Some(v) = queue.pop() {
                for &w in adj.get(&v).into_iter().flatten() {
                    if visited.insert(w) {
                        queue.push(w);
                    }
                }
            }
        }
        let labels: HashSet<u32> = cube.cells().iter().copied().filter(|&c| c != 0).collect();
        assert_eq!(labels.len(), components);
    }

    #[test]
    fn known_signature_partitions_like_reference() {
        // Reference grouping for 33EC01800846; labels may be renumbered but
        // the partition into groups must match.
        let expected = [
            3, 4, 5, 6, 1, 2, 7, 1, 2, //
            3, 4, 5, 6, 1, 8, 7, 1, 8, //
            9, 9, 0, 10, 10, 11, 12, 12, 11,
        ];
        let cube = decode_hex("33EC01800846").unwrap();
        let got = cube.cells();

        let mut fwd: HashMap<u32, u32> = HashMap::new();
        let mut rev: HashMap<u32, u32> = HashMap::new();
        for (&e, &g) in expected.iter().zip(got.iter()) {
            assert_eq!(e == 0, g == 0, "bandaged/unbandaged mismatch");
            if e == 0 {
                continue;
            }
            assert_eq!(*fwd.entry(e).or_insert(g), g);
            assert_eq!(*rev.entry(g).or_insert(e), e);
        }
    }

    #[test]
    fn list_separators_are_interchangeable() {
        let a = decode_list("1.1.1,1.1.1;1 1 1 2 2 2 2 2 2 3 3 3 3 3 3 0 0 0 0 0 0");
        let b = decode_list("1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 3 3 3 3 3 3 0 0 0 0 0 0");
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn list_requires_27_tokens() {
        assert!(decode_list("1 2 3").is_err());
        assert!(decode_list("").is_err());
        let ok = "0 ".repeat(27);
        assert!(decode_list(&ok).is_ok());
    }

    #[test]
    fn auto_detects_both_formats() {
        let hex = decode_auto("  33EC01800846 ").unwrap();
        assert_eq!(hex, decode_hex("33EC01800846").unwrap());

        let list = decode_auto("3.4.5,6.1.2,7.1.2, 3.4.5,6.1.8,7.1.8, 9.9.0,10.10.11,12.12.11");
        assert!(list.is_ok());

        assert!(decode_auto("12 34").is_err());
    }
}
