use std::fmt;

/// GPU-side objects whose release is tracked at teardown.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Resource {
    GeometryBuffer,
    VertexArray,
    Program,
    /// Window plus the GPU context bound to it.
    Context,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::GeometryBuffer => "geometry buffer",
            Resource::VertexArray => "vertex array",
            Resource::Program => "shader program",
            Resource::Context => "window/context",
        };
        f.write_str(s)
    }
}

/// Release ledger for teardown.
///
/// Handles are dropped through [`Lifecycle::release`], which records the kind
/// in release order. Ownership makes a second release of the same handle
/// impossible; a repeated kind only shows up if two handles of that kind were
/// created, which is logged.
#[derive(Debug, Default)]
pub struct Lifecycle {
    released: Vec<Resource>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops `handle` and records it as released.
    pub fn release<T>(&mut self, kind: Resource, handle: T) {
        drop(handle);
        self.record(kind);
    }

    fn record(&mut self, kind: Resource) {
        if self.released.contains(&kind) {
            log::warn!("{kind} released more than once");
        }
        log::debug!("released {kind}");
        self.released.push(kind);
    }

    /// Releases whatever `scene` and `context` still hold: scene handles
    /// first, then the context. Both slots are left empty, so calling this
    /// again releases nothing.
    pub fn release_remaining<G, V, P, C>(
        &mut self,
        scene: &mut Option<SceneHandles<G, V, P>>,
        context: &mut Option<C>,
    ) {
        if let Some(scene) = scene.take() {
            scene.release(self);
        }
        if let Some(context) = context.take() {
            self.release(Resource::Context, context);
        }
    }

    /// Kinds released so far, in release order.
    pub fn released(&self) -> &[Resource] {
        &self.released
    }

    pub fn release_count(&self, kind: Resource) -> usize {
        self.released.iter().filter(|&&k| k == kind).count()
    }

    /// True once every tracked kind has been released exactly once.
    pub fn is_complete(&self) -> bool {
        [
            Resource::GeometryBuffer,
            Resource::VertexArray,
            Resource::Program,
            Resource::Context,
        ]
        .iter()
        .all(|&k| self.release_count(k) == 1)
    }
}

/// The three per-scene GPU handles, released together.
pub struct SceneHandles<G, V, P> {
    pub geometry: G,
    pub vertex_array: V,
    pub program: P,
}

impl<G, V, P> SceneHandles<G, V, P> {
    /// Releases geometry buffer, vertex array and program, in that order.
    pub fn release(self, lifecycle: &mut Lifecycle) {
        let Self {
            geometry,
            vertex_array,
            program,
        } = self;

        lifecycle.release(Resource::GeometryBuffer, geometry);
        lifecycle.release(Resource::VertexArray, vertex_array);
        lifecycle.release(Resource::Program, program);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Appends its name to a shared log when dropped.
    struct Tracked {
        name: &'static str,
        drops: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.borrow_mut().push(self.name);
        }
    }

    fn tracked(name: &'static str, drops: &Rc<RefCell<Vec<&'static str>>>) -> Tracked {
        Tracked {
            name,
            drops: Rc::clone(drops),
        }
    }

    #[test]
    fn scene_release_drops_each_handle_once_in_order() {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let scene = SceneHandles {
            geometry: tracked("vbo", &drops),
            vertex_array: tracked("vao", &drops),
            program: tracked("program", &drops),
        };

        let mut lc = Lifecycle::new();
        scene.release(&mut lc);

        assert_eq!(*drops.borrow(), ["vbo", "vao", "program"]);
        assert_eq!(
            lc.released(),
            [
                Resource::GeometryBuffer,
                Resource::VertexArray,
                Resource::Program
            ]
        );
        assert!(!lc.is_complete());
    }

    #[test]
    fn full_teardown_releases_context_last() {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let scene = SceneHandles {
            geometry: tracked("vbo", &drops),
            vertex_array: tracked("vao", &drops),
            program: tracked("program", &drops),
        };
        let context = tracked("context", &drops);

        let mut lc = Lifecycle::new();
        scene.release(&mut lc);
        lc.release(Resource::Context, context);

        assert_eq!(*drops.borrow(), ["vbo", "vao", "program", "context"]);
        assert_eq!(lc.released().last(), Some(&Resource::Context));
        assert!(lc.is_complete());
        for kind in [
            Resource::GeometryBuffer,
            Resource::VertexArray,
            Resource::Program,
            Resource::Context,
        ] {
            assert_eq!(lc.release_count(kind), 1, "{kind}");
        }
    }

    #[test]
    fn repeated_teardown_releases_each_handle_once() {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Some(SceneHandles {
            geometry: tracked("vbo", &drops),
            vertex_array: tracked("vao", &drops),
            program: tracked("program", &drops),
        });
        let mut context = Some(tracked("context", &drops));

        let mut lc = Lifecycle::new();
        lc.release_remaining(&mut scene, &mut context);
        lc.release_remaining(&mut scene, &mut context);
        lc.release_remaining(&mut scene, &mut context);

        assert!(scene.is_none() && context.is_none());
        assert_eq!(*drops.borrow(), ["vbo", "vao", "program", "context"]);
        assert!(lc.is_complete());
    }

    #[test]
    fn teardown_without_scene_still_releases_context() {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let mut scene: Option<SceneHandles<Tracked, Tracked, Tracked>> = None;
        let mut context = Some(tracked("context", &drops));

        let mut lc = Lifecycle::new();
        lc.release_remaining(&mut scene, &mut context);
        lc.release_remaining(&mut scene, &mut context);

        assert_eq!(*drops.borrow(), ["context"]);
        assert_eq!(lc.released(), [Resource::Context]);
    }

    #[test]
    fn context_only_teardown_is_incomplete() {
        let drops = Rc::new(RefCell::new(Vec::new()));
        let mut lc = Lifecycle::new();
        lc.release(Resource::Context, tracked("context", &drops));

        assert_eq!(*drops.borrow(), ["context"]);
        assert_eq!(lc.release_count(Resource::Program), 0);
        assert!(!lc.is_complete());
    }

    #[test]
    fn duplicate_kind_is_counted() {
        let mut lc = Lifecycle::new();
        lc.release(Resource::Program, ());
        lc.release(Resource::Program, ());
        assert_eq!(lc.release_count(Resource::Program), 2);
        assert!(!lc.is_complete());
    }
}
