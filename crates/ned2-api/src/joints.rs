//! 关节配置类型

use std::fmt;
use std::ops::{Index, IndexMut};

/// 六轴关节角（rad），J1..J6 按驱动顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointArray(pub [f64; 6]);

impl JointArray {
    pub const LEN: usize = 6;

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

impl From<[f64; 6]> for JointArray {
    fn from(values: [f64; 6]) -> Self {
        Self(values)
    }
}

impl From<JointArray> for [f64; 6] {
    fn from(joints: JointArray) -> Self {
        joints.0
    }
}

impl Index<usize> for JointArray {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for JointArray {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl fmt::Display for JointArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.3}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_three_decimals() {
        let joints = JointArray::from([-0.081, 0.239, -0.595, -0.017, -1.201, -0.093]);
        assert_eq!(
            joints.to_string(),
            "[-0.081, 0.239, -0.595, -0.017, -1.201, -0.093]"
        );
    }

    #[test]
    fn index_access() {
        let mut joints = JointArray::default();
        joints[3] = 1.5;
        assert_eq!(joints[3], 1.5);
        assert_eq!(joints[0], 0.0);
    }
}
