use glam::Mat4;
use rustc_hash::FxHashMap;
use sinew_core::{Result, SinewError};
use smallvec::SmallVec;
use uuid::Uuid;

/// One joint of a [`BoneHierarchy`].
#[derive(Debug, Clone)]
pub struct BoneNode {
    pub name: String,
    /// Index of the parent bone; `None` for the root.
    pub parent: Option<usize>,
    /// Local transform used when no animation channel drives this bone.
    pub bind_local: Mat4,
    /// Takes mesh-space vertices into this bone's space for skinning.
    pub inverse_bind: Mat4,
}

impl BoneNode {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>, bind_local: Mat4) -> Self {
        Self {
            name: name.into(),
            parent,
            bind_local,
            inverse_bind: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn with_inverse_bind(mut self, inverse_bind: Mat4) -> Self {
        self.inverse_bind = inverse_bind;
        self
    }
}

/// Static bone tree stored as a flat arena.
///
/// Bones are addressed by index; index 0 is the single root and every bone's
/// parent has a smaller index than the bone itself, so a front-to-back walk
/// visits parents before children. These invariants are checked at load time
/// and the hierarchy is immutable afterwards.
#[derive(Debug, Clone)]
pub struct BoneHierarchy {
    id: Uuid,
    bones: Vec<BoneNode>,
    lookup: FxHashMap<String, usize>,
}

impl BoneHierarchy {
    /// Validates an already ordered list of bones.
    pub fn new(bones: Vec<BoneNode>) -> Result<Self> {
        if bones.is_empty() {
            return Err(SinewError::EmptyHierarchy);
        }

        let mut lookup = FxHashMap::default();
        let mut root: Option<usize> = None;

        for (index, bone) in bones.iter().enumerate() {
            if lookup.insert(bone.name.clone(), index).is_some() {
                return Err(SinewError::DuplicateBone(bone.name.clone()));
            }

            match bone.parent {
                None => {
                    if let Some(first) = root {
                        return Err(SinewError::MultipleRoots {
                            first: bones[first].name.clone(),
                            second: bone.name.clone(),
                        });
                    }
                    if index != 0 {
                        return Err(SinewError::ParentAfterChild {
                            bone: bones[0].name.clone(),
                            index: 0,
                            parent: index,
                        });
                    }
                    root = Some(index);
                }
                Some(parent) if parent >= bones.len() => {
                    return Err(SinewError::OrphanedBone {
                        bone: bone.name.clone(),
                        parent: parent.to_string(),
                    });
                }
                Some(parent) if parent == index => {
                    return Err(SinewError::HierarchyCycle(bone.name.clone()));
                }
                Some(parent) if parent > index => {
                    return Err(SinewError::ParentAfterChild {
                        bone: bone.name.clone(),
                        index,
                        parent,
                    });
                }
                Some(_) => {}
            }
        }

        if root.is_none() {
            return Err(SinewError::MissingRoot);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            bones,
            lookup,
        })
    }

    /// Identifies this hierarchy for binding caches.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[BoneNode] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&BoneNode> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    #[must_use]
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }
}

struct PendingBone {
    name: String,
    parent: Option<String>,
    bind_local: Mat4,
    inverse_bind: Mat4,
}

/// Collects bones by name in any order and sorts them into a
/// [`BoneHierarchy`].
///
/// ```rust,ignore
/// let hierarchy = BoneHierarchyBuilder::new()
///     .bone("hand", Some("arm"), hand_bind)
///     .bone("arm", None, Mat4::IDENTITY)
///     .build()?;
/// assert_eq!(hierarchy.index_of("arm"), Some(0));
/// ```
#[derive(Default)]
pub struct BoneHierarchyBuilder {
    pending: Vec<PendingBone>,
}

impl BoneHierarchyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bone(self, name: impl Into<String>, parent: Option<&str>, bind_local: Mat4) -> Self {
        self.bone_with_inverse_bind(name, parent, bind_local, Mat4::IDENTITY)
    }

    #[must_use]
    pub fn bone_with_inverse_bind(
        mut self,
        name: impl Into<String>,
        parent: Option<&str>,
        bind_local: Mat4,
        inverse_bind: Mat4,
    ) -> Self {
        self.pending.push(PendingBone {
            name: name.into(),
            parent: parent.map(str::to_string),
            bind_local,
            inverse_bind,
        });
        self
    }

    /// Orders the bones depth-first from the root, keeping siblings in
    /// insertion order.
    pub fn build(self) -> Result<BoneHierarchy> {
        if self.pending.is_empty() {
            return Err(SinewError::EmptyHierarchy);
        }

        let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, bone) in self.pending.iter().enumerate() {
            if by_name.insert(bone.name.as_str(), i).is_some() {
                return Err(SinewError::DuplicateBone(bone.name.clone()));
            }
        }

        let mut root: Option<usize> = None;
        let mut parents: Vec<Option<usize>> = vec![None; self.pending.len()];
        let mut children: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); self.pending.len()];
        for (i, bone) in self.pending.iter().enumerate() {
            match &bone.parent {
                None => {
                    if let Some(first) = root {
                        return Err(SinewError::MultipleRoots {
                            first: self.pending[first].name.clone(),
                            second: bone.name.clone(),
                        });
                    }
                    root = Some(i);
                }
                Some(parent) => {
                    let Some(&p) = by_name.get(parent.as_str()) else {
                        return Err(SinewError::OrphanedBone {
                            bone: bone.name.clone(),
                            parent: parent.clone(),
                        });
                    };
                    parents[i] = Some(p);
                    children[p].push(i);
                }
            }
        }
        let Some(root) = root else {
            return Err(SinewError::MissingRoot);
        };

        // Depth-first from the root. With exactly one root and every parent
        // resolved, anything left unvisited hangs off a cycle.
        let mut order = Vec::with_capacity(self.pending.len());
        let mut visited = vec![false; self.pending.len()];
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            visited[i] = true;
            order.push(i);
            stack.extend(children[i].iter().rev().copied());
        }
        if let Some(stray) = visited.iter().position(|v| !v) {
            return Err(SinewError::HierarchyCycle(self.pending[stray].name.clone()));
        }

        let mut new_index = vec![0usize; self.pending.len()];
        for (new, &old) in order.iter().enumerate() {
            new_index[old] = new;
        }

        let mut slots: Vec<Option<PendingBone>> = self.pending.into_iter().map(Some).collect();
        let bones = order
            .iter()
            .filter_map(|&old| {
                slots[old].take().map(|bone| BoneNode {
                    name: bone.name,
                    parent: parents[old].map(|p| new_index[p]),
                    bind_local: bone.bind_local,
                    inverse_bind: bone.inverse_bind,
                })
            })
            .collect();

        BoneHierarchy::new(bones)
    }
}
