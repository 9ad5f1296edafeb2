//! Pose blending for skeletal animation
//!
//! Provides crossfade blending between two full pose arrays and weighted
//! mixing of any number of sampled clips.

/// A single joint's local-space pose (translation, rotation, scale)
#[derive(Debug, Clone, PartialEq)]
pub struct JointPose {
    pub translation: [f32; 3],
    pub rotation: [f32; 4], // quaternion xyzw
    pub scale: [f32; 3],
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0], // identity quaternion
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Linearly blend two full pose arrays.
///
/// Translation and scale use component-wise lerp.
/// Rotation uses quaternion slerp for correct interpolation.
/// `weight` of 0.0 = fully `a`, 1.0 = fully `b`.
pub fn blend_poses(a: &[JointPose], b: &[JointPose], weight: f32, out: &mut [JointPose]) {
    let count = a.len().min(b.len()).min(out.len());
    let w = weight.clamp(0.0, 1.0);
    let iw = 1.0 - w;

    for i in 0..count {
        out[i].translation = [
            a[i].translation[0] * iw + b[i].translation[0] * w,
            a[i].translation[1] * iw + b[i].translation[1] * w,
            a[i].translation[2] * iw + b[i].translation[2] * w,
        ];

        out[i].scale = [
            a[i].scale[0] * iw + b[i].scale[0] * w,
            a[i].scale[1] * iw + b[i].scale[1] * w,
            a[i].scale[2] * iw + b[i].scale[2] * w,
        ];

        out[i].rotation = quat_slerp(&a[i].rotation, &b[i].rotation, w);
    }
}

/// Mix any number of poses by weight.
///
/// Layers are folded in order: each new layer is blended into the running
/// result by `weight / (accumulated + weight)`, which gives every layer its
/// share of the total. Weights need not sum to one; zero-weight layers are
/// skipped. With no contributing layer `out` is left untouched.
pub fn blend_weighted(layers: &[(&[JointPose], f32)], out: &mut [JointPose]) {
    let mut accumulated = 0.0f32;

    for &(pose, weight) in layers {
        if weight <= 0.0 {
            continue;
        }

        if accumulated <= 0.0 {
            for (dst, src) in out.iter_mut().zip(pose.iter()) {
                *dst = src.clone();
            }
        } else {
            let current: Vec<JointPose> = out.to_vec();
            blend_poses(&current, pose, weight / (accumulated + weight), out);
        }
        accumulated += weight;
    }
}

/// Quaternion slerp with shortest-path correction
fn quat_slerp(a: &[f32; 4], b: &[f32; 4], t: f32) -> [f32; 4] {
    let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

    // Ensure shortest path
    let mut b_adj = *b;
    if dot < 0.0 {
        b_adj = [-b[0], -b[1], -b[2], -b[3]];
        dot = -dot;
    }

    // If very close, use lerp to avoid division by zero
    if dot > 0.9995 {
        let result = [
            a[0] + t * (b_adj[0] - a[0]),
            a[1] + t * (b_adj[1] - a[1]),
            a[2] + t * (b_adj[2] - a[2]),
            a[3] + t * (b_adj[3] - a[3]),
        ];
        return quat_normalize(&result);
    }

    let theta = dot.acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;

    [
        a[0] * wa + b_adj[0] * wb,
        a[1] * wa + b_adj[1] * wb,
        a[2] * wa + b_adj[2] * wb,
        a[3] * wa + b_adj[3] * wb,
    ]
}

fn quat_normalize(q: &[f32; 4]) -> [f32; 4] {
    let len = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if len < 1e-10 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    [q[0] / len, q[1] / len, q[2] / len, q[3] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translated(x: f32) -> JointPose {
        JointPose {
            translation: [x, 0.0, 0.0],
            ..Default::default()
        }
    }

    fn yaw(angle: f32) -> JointPose {
        JointPose {
            rotation: [0.0, (angle / 2.0).sin(), 0.0, (angle / 2.0).cos()],
            ..Default::default()
        }
    }

    #[test]
    fn blend_weight_zero_returns_a() {
        let a = [JointPose {
            translation: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }];
        let b = [JointPose {
            translation: [10.0, 20.0, 30.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [2.0, 2.0, 2.0],
        }];
        let mut out = [JointPose::default()];
        blend_poses(&a, &b, 0.0, &mut out);
        assert!((out[0].translation[0] - 1.0).abs() < 1e-5);
        assert!((out[0].translation[1] - 2.0).abs() < 1e-5);
        assert!((out[0].scale[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn blend_midpoint_interpolates() {
        let a = [JointPose::default()];
        let b = [JointPose {
            translation: [10.0, 20.0, 30.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [3.0, 3.0, 3.0],
        }];
        let mut out = [JointPose::default()];
        blend_poses(&a, &b, 0.5, &mut out);
        assert!((out[0].translation[0] - 5.0).abs() < 1e-5);
        assert!((out[0].translation[1] - 10.0).abs() < 1e-5);
        assert!((out[0].scale[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn blend_rotation_slerp_midpoint() {
        let angle = std::f32::consts::FRAC_PI_2;
        let a = [JointPose::default()];
        let b = [yaw(angle)];
        let mut out = [JointPose::default()];
        blend_poses(&a, &b, 0.5, &mut out);

        // Should be 45 degrees around Y
        let half_angle = angle / 4.0;
        assert!((out[0].rotation[1] - half_angle.sin()).abs() < 1e-4);
        assert!((out[0].rotation[3] - half_angle.cos()).abs() < 1e-4);
    }

    #[test]
    fn weighted_three_way_average() {
        let a = [translated(0.0)];
        let b = [translated(3.0)];
        let c = [translated(9.0)];
        let mut out = [JointPose::default()];

        blend_weighted(&[(&a[..], 1.0), (&b[..], 1.0), (&c[..], 1.0)], &mut out);
        assert!((out[0].translation[0] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn weighted_unnormalized_weights() {
        let a = [translated(0.0)];
        let b = [translated(10.0)];
        let mut out = [JointPose::default()];

        // 0.2 : 0.6 is a quarter / three quarters split
        blend_weighted(&[(&a[..], 0.2), (&b[..], 0.6)], &mut out);
        assert!((out[0].translation[0] - 7.5).abs() < 1e-4);
    }

    #[test]
    fn weighted_skips_silent_layers() {
        let a = [translated(4.0)];
        let b = [translated(100.0)];
        let mut out = [JointPose::default()];

        blend_weighted(&[(&b[..], 0.0), (&a[..], 0.5)], &mut out);
        assert!((out[0].translation[0] - 4.0).abs() < 1e-6);

        let mut untouched = [translated(-1.0)];
        blend_weighted(&[(&b[..], 0.0)], &mut untouched);
        assert_eq!(untouched[0].translation[0], -1.0);
    }
}
