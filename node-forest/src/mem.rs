use std::ops::{Index, IndexMut};

/// A handle to an occupied slot of a `SliceAlloc`
///
/// The generation changes every time the slot is freed,
/// so a key outliving its data never resolves to the next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SliceKey {
    index: u32,
    generation: u32,
}

impl SliceKey {
    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

enum Slot<T> {
    Vacant {
        generation: u32,
        next_free: Option<u32>,
    },
    Occupied {
        generation: u32,
        data: T,
    },
}

struct SliceBuf<T, const N: usize> {
    slots: Box<[Slot<T>; N]>,
}

impl<T, const N: usize> SliceBuf<T, N> {
    fn new() -> Self {
        Self {
            slots: Box::new(std::array::from_fn(|_| Slot::Vacant {
                generation: 0,
                next_free: None,
            })),
        }
    }
}

/// Allocates items in fixed-size slices and reuses freed slots first
pub(crate) struct SliceAlloc<T, const N: usize> {
    slices: Vec<SliceBuf<T, N>>,
    last_freed: Option<u32>,
    next_unused: usize,
    len: usize,
}

impl<T, const N: usize> SliceAlloc<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            slices: vec![],
            last_freed: None,
            next_unused: 0,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut ret = Self::new();
        let count = (capacity + N - 1) / N;
        ret.slices.reserve(count);
        for _ in 0..count {
            ret.slices.push(SliceBuf::new());
        }
        ret
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    fn slot(&self, index: usize) -> Option<&Slot<T>> {
        if index >= self.next_unused {
            return None;
        }
        Some(&self.slices[index / N].slots[index % N])
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<T>> {
        if index >= self.next_unused {
            return None;
        }
        Some(&mut self.slices[index / N].slots[index % N])
    }

    pub(crate) fn alloc(&mut self, data: T) -> SliceKey {
        let (index, generation) = match self.last_freed {
            Some(index) => {
                let (generation, next_free) = match self.slot(index as usize) {
                    Some(Slot::Vacant {
                        generation,
                        next_free,
                    }) => (*generation, *next_free),
                    _ => panic!("The free list of the slice allocator is corrupted"),
                };
                self.last_freed = next_free;
                (index, generation)
            }
            None => {
                if self.next_unused == self.slices.len() * N {
                    self.slices.push(SliceBuf::new());
                }
                let index = self.next_unused;
                self.next_unused += 1;
                (index as u32, 0)
            }
        };
        if let Some(slot) = self.slot_mut(index as usize) {
            *slot = Slot::Occupied { generation, data };
        }
        self.len += 1;
        SliceKey { index, generation }
    }

    pub(crate) fn free(&mut self, key: SliceKey) -> Option<T> {
        let next_free = self.last_freed;
        let slot = self.slot_mut(key.index())?;
        match &*slot {
            Slot::Occupied { generation, .. } if *generation == key.generation => {}
            _ => return None,
        }
        let old = std::mem::replace(
            slot,
            Slot::Vacant {
                generation: key.generation.wrapping_add(1),
                next_free,
            },
        );
        self.last_freed = Some(key.index);
        self.len -= 1;
        match old {
            Slot::Occupied { data, .. } => Some(data),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get(&self, key: SliceKey) -> Option<&T> {
        match self.slot(key.index())? {
            Slot::Occupied { generation, data } if *generation == key.generation => Some(data),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: SliceKey) -> Option<&mut T> {
        match self.slot_mut(key.index())? {
            Slot::Occupied { generation, data } if *generation == key.generation => Some(data),
            _ => None,
        }
    }
}

impl<T, const N: usize> Index<SliceKey> for SliceAlloc<T, N> {
    type Output = T;

    fn index(&self, key: SliceKey) -> &T {
        match self.get(key) {
            Some(x) => x,
            None => panic!("The slot has been released"),
        }
    }
}

impl<T, const N: usize> IndexMut<SliceKey> for SliceAlloc<T, N> {
    fn index_mut(&mut self, key: SliceKey) -> &mut T {
        match self.get_mut(key) {
            Some(x) => x,
            None => panic!("The slot has been released"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reuse() {
        let mut sa: SliceAlloc<usize, 3> = SliceAlloc::new();
        let d10 = sa.alloc(10);
        let d11 = sa.alloc(11);
        assert_eq!(d11.index() - d10.index(), 1);
        let (d12, d13) = {
            let d12 = sa.alloc(12);
            let d13 = sa.alloc(13);
            assert_eq!(sa[d10], 10);
            assert_eq!(sa[d11], 11);
            assert_eq!(sa[d12], 12);
            assert_eq!(sa[d13], 13);
            (d12, d13)
        };
        assert_eq!(d13.index(), 3);
        assert_eq!(sa.len(), 4);
        assert_eq!(sa.free(d12), Some(12));
        assert_eq!(sa.free(d13), Some(13));
        assert_eq!(sa.len(), 2);
        let d23 = sa.alloc(23);
        let d22 = sa.alloc(22);
        assert_eq!(sa[d22], 22);
        assert_eq!(sa[d23], 23);
        assert_eq!(d22.index(), d12.index());
        assert_eq!(d23.index(), d13.index());
        assert_ne!(d22.generation(), d12.generation());
    }

    #[test]
    fn stale_key() {
        let mut sa: SliceAlloc<usize, 16> = SliceAlloc::new();
        let _d10 = sa.alloc(10);
        let d11 = sa.alloc(11);
        assert_eq!(sa.free(d11), Some(11));
        assert!(sa.get(d11).is_none());
        assert!(sa.free(d11).is_none());
        let d12 = sa.alloc(12);
        assert_eq!(d12.index(), d11.index());
        assert!(sa.get(d11).is_none());
        assert_eq!(sa.get(d12), Some(&12));
        *sa.get_mut(d12).unwrap() = 13;
        assert_eq!(sa[d12], 13);
    }

    #[test]
    fn preallocated() {
        let mut sa: SliceAlloc<u8, 4> = SliceAlloc::with_capacity(9);
        assert_eq!(sa.slices.len(), 3);
        let keys: Vec<_> = (0..9u8).map(|i| sa.alloc(i)).collect();
        assert_eq!(sa.slices.len(), 3);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(sa[*key] as usize, i);
        }
        sa.alloc(9);
        assert_eq!(sa.slices.len(), 3);
        sa.alloc(10);
        sa.alloc(11);
        sa.alloc(12);
        assert_eq!(sa.slices.len(), 4);
    }
}
