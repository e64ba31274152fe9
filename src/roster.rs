//! 候选名单
//!
//! 启动时由固定列表创建，进程生命周期内不再变化

use std::fmt;

use rand::Rng;

/// 候选者标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub u32);

/// 单个候选者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 唯一标识
    pub id: CandidateId,
    /// 显示名称
    pub name: String,
    /// 图片资源路径（相对 assets 目录）
    pub image: String,
}

impl Candidate {
    /// 以名称创建候选者，图片路径按 `images/<name>.png` 推导
    #[must_use]
    pub fn named(id: u32, name: &str) -> Self {
        Self {
            id: CandidateId(id),
            name: name.to_string(),
            image: format!("images/{name}.png"),
        }
    }
}

/// 名单构建错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// 名单为空
    Empty,
    /// 存在重复的候选者标识
    DuplicateId(CandidateId),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "候选名单为空"),
            Self::DuplicateId(id) => write!(f, "候选者标识重复: {}", id.0),
        }
    }
}

impl std::error::Error for RosterError {}

/// 内置名单
const BUILTIN_NAMES: [&str; 4] = ["Max", "Jameson", "Gabe", "Chaden"];

/// 内置候选者列表，按显示顺序排列
#[must_use]
pub fn builtin_candidates() -> Vec<Candidate> {
    BUILTIN_NAMES
        .iter()
        .zip(0u32..)
        .map(|(name, id)| Candidate::named(id, name))
        .collect()
}

/// 固定顺序的候选名单
#[derive(Debug, Clone)]
pub struct Roster {
    candidates: Vec<Candidate>,
}

impl Roster {
    /// 由候选者列表创建名单
    ///
    /// # Errors
    ///
    /// - 列表为空
    /// - 候选者标识重复
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, RosterError> {
        if candidates.is_empty() {
            return Err(RosterError::Empty);
        }
        for (i, c) in candidates.iter().enumerate() {
            if candidates.iter().skip(i + 1).any(|o| o.id == c.id) {
                return Err(RosterError::DuplicateId(c.id));
            }
        }
        Ok(Self { candidates })
    }

    /// 候选者数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// 名单是否为空（构造保证恒为 false）
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// 按索引取候选者
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// 按标识取候选者
    #[must_use]
    pub fn by_id(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// 标识对应的索引
    #[must_use]
    pub fn index_of(&self, id: CandidateId) -> Option<usize> {
        self.candidates.iter().position(|c| c.id == id)
    }

    /// 第一个候选者
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn first(&self) -> &Candidate {
        // 构造时已拒绝空名单
        &self.candidates[0]
    }

    /// 遍历候选者
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// 均匀随机选出一个与 `exclude` 不同的候选者索引
    ///
    /// 采用拒绝重采样。名单只有一人时不存在其他选项，直接返回该唯一索引。
    pub fn pick_excluding<R: Rng + ?Sized>(
        &self,
        exclude: Option<CandidateId>,
        rng: &mut R,
    ) -> usize {
        let n = self.candidates.len();
        let excluded = exclude.and_then(|id| self.index_of(id));
        if n < 2 {
            return 0;
        }
        loop {
            let idx = rng.random_range(0..n);
            if Some(idx) != excluded {
                return idx;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn builtin_roster_order() {
        let roster = Roster::new(builtin_candidates()).unwrap();
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Max", "Jameson", "Gabe", "Chaden"]);
        assert_eq!(roster.first().image, "images/Max.png");
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(Roster::new(Vec::new()).unwrap_err(), RosterError::Empty);
        let dup = vec![Candidate::named(1, "A"), Candidate::named(1, "B")];
        assert_eq!(
            Roster::new(dup).unwrap_err(),
            RosterError::DuplicateId(CandidateId(1))
        );
    }

    #[test]
    fn pick_never_returns_excluded() {
        let roster = Roster::new(builtin_candidates()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let chaden = roster.get(3).unwrap().id;
        let mut seen = [0usize; 4];
        for _ in 0..3000 {
            let idx = roster.pick_excluding(Some(chaden), &mut rng);
            seen[idx] += 1;
        }
        assert_eq!(seen[3], 0);
        // 其余三人大致均匀
        for count in &seen[..3] {
            assert!((800..1200).contains(count), "分布偏差过大: {seen:?}");
        }
    }

    #[test]
    fn single_candidate_pick_terminates() {
        let roster = Roster::new(vec![Candidate::named(9, "Solo")]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(roster.pick_excluding(Some(CandidateId(9)), &mut rng), 0);
    }
}
