// GF(256) arithmetic
//------------------------------------------------------------------------------

/// Reduction polynomial x^8 + x^4 + x^3 + x^2 + 1.
pub static GF_MODULUS: u32 = 0x11D;

/// Product of two field elements modulo GF(2^8/0x11D), by Russian peasant
/// multiplication.
pub fn gf_mul(x: u8, y: u8) -> u8 {
    let mut z: u32 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * GF_MODULUS);
        z ^= (((y as u32) >> i) & 1) * (x as u32);
    }
    debug_assert!(z >> 8 == 0, "Product out of field: {z}");
    z as u8
}


// Generator polynomial
//------------------------------------------------------------------------------

/// Generator polynomial (x - 2^0)(x - 2^1)...(x - 2^(degree-1)).
///
/// Coefficients are stored from highest to lowest power, excluding the leading
/// term which is always 1. For example x^3 + 255x^2 + 8x + 93 is stored as
/// [255, 8, 93].
pub fn generator_poly(degree: usize) -> Vec<u8> {
    assert!((1..=255).contains(&degree), "Degree out of range: {degree}");

    let mut res = vec![0u8; degree];
    res[degree - 1] = 1;

    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            res[j] = gf_mul(res[j], root);
            if j + 1 < degree {
                res[j] ^= res[j + 1];
            }
        }
        root = gf_mul(root, 0x02);
    }
    res
}


// Remainder
//------------------------------------------------------------------------------

/// Reed-Solomon ecc for `data`, i.e. the remainder of data * x^d divided by the
/// degree d generator.
pub fn ecc(data: &[u8], generator: &[u8]) -> Vec<u8> {
    let mut res = vec![0u8; generator.len()];
    for &b in data {
        let factor = b ^ res[0];
        res.rotate_left(1);
        if let Some(last) = res.last_mut() {
            *last = 0;
        }
        for (r, &g) in res.iter_mut().zip(generator) {
            *r ^= gf_mul(g, factor);
        }
    }
    res
}
