use crate::math::{Bounds3, Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Primitives_and_Intersection_Acceleration/Bounding_Volume_Hierarchies.html

const MAX_TRIANGLES_IN_NODE: usize = 4;
// Bounds the traversal stack, deeper subtrees become leaves
const MAX_DEPTH: usize = 48;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SplitMethod {
    Middle,
    EqualCounts,
}

/// Flattened bounding volume hierarchy over the triangle arena of a scene.
pub struct BoundingVolumeHierarchy {
    split_method: SplitMethod,
    nodes: Vec<BVHNode>,
    // Triangle indices in leaf order
    triangles: Vec<u32>,
}

impl BoundingVolumeHierarchy {
    /// Creates a new `BoundingVolumeHierarchy` for triangles with the given bounds.
    /// `bounds[i]` is the bound of triangle `i`.
    pub fn new(bounds: &[Bounds3], split_method: SplitMethod) -> Self {
        let mut triangle_info: Vec<BVHPrimitiveInfo> = bounds
            .iter()
            .enumerate()
            .map(|(i, &b)| BVHPrimitiveInfo {
                triangle: i as u32,
                bounds: b,
                centroid: b.centroid(),
            })
            .collect();

        let mut ret = Self {
            split_method,
            nodes: Vec::new(),
            triangles: Vec::with_capacity(bounds.len()),
        };
        if triangle_info.is_empty() {
            return ret;
        }

        let end = triangle_info.len();
        let (root, node_count) = ret.recursive_build(&mut triangle_info, 0, end, 0);

        ret.nodes = vec![BVHNode::default(); node_count];
        ret.flatten_tree(root, 0);

        log::trace!(
            "BVH: {} nodes over {} triangles",
            ret.nodes.len(),
            ret.triangles.len()
        );

        ret
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finds the nearest hit further than `tolerance` along `ray`.
    ///
    /// `test` returns the hit distance of a triangle. Hits within `tolerance`
    /// of each other resolve to the lower triangle index.
    pub fn intersect<F>(&self, ray: &Ray, tolerance: f32, test: F) -> Option<(u32, f32)>
    where
        F: Fn(u32, &Ray) -> Option<f32>,
    {
        let mut ray = *ray;
        let mut hit: Option<(u32, f32)> = None;
        self.traverse(&mut ray, |triangle, ray| {
            if let Some(t) = test(triangle, ray) {
                if t > tolerance {
                    let closer = match hit {
                        None => true,
                        Some((old_triangle, old_t)) => {
                            t < old_t - tolerance
                                || (t <= old_t + tolerance && triangle < old_triangle)
                        }
                    };
                    if closer {
                        hit = Some((triangle, t));
                        // Keep the tie window open for lower indices further in
                        ray.t_max = t + tolerance;
                    }
                }
            }
            false
        });
        hit
    }

    /// Checks if `test` reports any hit within `(t_min, ray.t_max]`.
    pub fn any_hit<F>(&self, ray: &Ray, t_min: f32, test: F) -> bool
    where
        F: Fn(u32, &Ray) -> Option<f32>,
    {
        let mut ray = *ray;
        let mut found = false;
        self.traverse(&mut ray, |triangle, ray| {
            if let Some(t) = test(triangle, ray) {
                found = t > t_min;
            }
            found
        });
        found
    }

    // Calls `visit` for each triangle in the leaves hit by `ray`, front to back.
    // `visit` can shorten the ray and returns `true` to stop the traversal.
    fn traverse<F>(&self, ray: &mut Ray, mut visit: F)
    where
        F: FnMut(u32, &mut Ray) -> bool,
    {
        if self.nodes.is_empty() {
            return;
        }

        let inv_dir = ray.d.recip();
        let dir_is_neg = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];

        let mut current_node_index = 0;
        let mut to_visit_index = 0;
        let mut to_visit_stack = [0; MAX_DEPTH + 2];
        loop {
            let node = self.nodes[current_node_index];
            if node.bounds.intersect(ray, inv_dir, dir_is_neg) {
                match node.content {
                    NodeContent::Interior {
                        second_child_index,
                        split_axis,
                    } => {
                        // Traverse children front to back
                        if dir_is_neg[split_axis as usize] {
                            to_visit_stack[to_visit_index] = current_node_index + 1;
                            to_visit_index += 1;
                            current_node_index = second_child_index as usize;
                        } else {
                            to_visit_stack[to_visit_index] = second_child_index as usize;
                            to_visit_index += 1;
                            current_node_index += 1;
                        }
                        continue;
                    }
                    NodeContent::Leaf {
                        first_triangle_index,
                        triangle_count,
                    } => {
                        let first = first_triangle_index as usize;
                        let range = first..(first + triangle_count as usize);
                        for &triangle in &self.triangles[range] {
                            if visit(triangle, ray) {
                                return;
                            }
                        }
                    }
                    NodeContent::Uninitialized => unreachable!(),
                }
            }

            if to_visit_index == 0 {
                break;
            }
            to_visit_index -= 1;
            current_node_index = to_visit_stack[to_visit_index];
        }
    }

    /// Builds the BVH
    fn recursive_build(
        &mut self,
        triangle_info: &mut [BVHPrimitiveInfo],
        start: usize,
        end: usize,
        depth: usize,
    ) -> (Box<BVHBuildNode>, usize) {
        let bounds = triangle_info[start..end]
            .iter()
            .fold(Bounds3::empty(), |b, s| b.union_b(s.bounds));
        let first_triangle_index = self.triangles.len();

        let triangle_count = end - start;
        macro_rules! init_leaf {
            () => {{
                self.triangles
                    .extend(triangle_info[start..end].iter().map(|s| s.triangle));
                (
                    BVHBuildNode::leaf(first_triangle_index, triangle_count, bounds),
                    1,
                )
            }};
        }

        if triangle_count <= MAX_TRIANGLES_IN_NODE || depth >= MAX_DEPTH {
            return init_leaf!();
        }

        let centroid_bounds = triangle_info[start..end]
            .iter()
            .fold(Bounds3::empty(), |b, s| b.union_p(s.centroid));
        let axis = centroid_bounds.maximum_extent();

        if centroid_bounds.p_max[axis] == centroid_bounds.p_min[axis] {
            return init_leaf!();
        }

        let mut mid = start;
        // We need to fall back to 'equal counts' if 'middle' fails
        let split_method = match self.split_method {
            SplitMethod::Middle => {
                let mid_value = (centroid_bounds.p_min[axis] + centroid_bounds.p_max[axis]) / 2.0;
                mid = itertools::partition(triangle_info[start..end].iter_mut(), |s| {
                    s.centroid[axis] < mid_value
                }) + start;

                if mid != start && mid != end {
                    SplitMethod::Middle
                } else {
                    SplitMethod::EqualCounts
                }
            }
            SplitMethod::EqualCounts => SplitMethod::EqualCounts,
        };

        if split_method == SplitMethod::EqualCounts {
            mid = (start + end) / 2;
            triangle_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                a.centroid[axis]
                    .partial_cmp(&b.centroid[axis])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        debug_assert!(mid != start && mid != end, "BVH: Split failed");

        let (child0, child0_node_count) = self.recursive_build(triangle_info, start, mid, depth + 1);
        let (child1, child1_node_count) = self.recursive_build(triangle_info, mid, end, depth + 1);
        (
            BVHBuildNode::interior(axis, child0, child1),
            1 + child0_node_count + child1_node_count,
        )
    }

    fn flatten_tree(&mut self, root: Box<BVHBuildNode>, mut next_index: usize) -> usize {
        match root.content {
            BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            } => {
                let self_index = next_index;
                let second_child_index = self.flatten_tree(child0, self_index + 1);
                next_index = self.flatten_tree(child1, second_child_index);
                self.nodes[self_index] =
                    BVHNode::interior(root.bounds, second_child_index, split_axis);
            }
            BuildNodeContent::Leaf {
                first_triangle_index,
                triangle_count,
            } => {
                self.nodes[next_index] =
                    BVHNode::leaf(root.bounds, first_triangle_index, triangle_count);
                next_index += 1;
            }
        }
        next_index
    }
}

struct BVHPrimitiveInfo {
    triangle: u32,
    bounds: Bounds3,
    centroid: Vec3,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum NodeContent {
    Interior {
        second_child_index: u32,
        split_axis: u8,
    },
    Leaf {
        first_triangle_index: u32,
        triangle_count: u32,
    },
    Uninitialized,
}

#[derive(Copy, Clone)]
struct BVHNode {
    bounds: Bounds3,
    content: NodeContent,
}

impl BVHNode {
    fn default() -> Self {
        Self {
            bounds: Bounds3::empty(),
            content: NodeContent::Uninitialized,
        }
    }

    fn interior(bounds: Bounds3, second_child_index: usize, split_axis: usize) -> Self {
        Self {
            bounds,
            content: NodeContent::Interior {
                second_child_index: second_child_index as u32,
                split_axis: split_axis as u8,
            },
        }
    }

    fn leaf(bounds: Bounds3, first_triangle_index: usize, triangle_count: usize) -> Self {
        Self {
            bounds,
            content: NodeContent::Leaf {
                first_triangle_index: first_triangle_index as u32,
                triangle_count: triangle_count as u32,
            },
        }
    }
}

enum BuildNodeContent {
    Interior {
        children: [Box<BVHBuildNode>; 2],
        split_axis: usize,
    },
    Leaf {
        // Index into the ordered triangle array
        first_triangle_index: usize,
        triangle_count: usize,
    },
}

struct BVHBuildNode {
    bounds: Bounds3,
    content: BuildNodeContent,
}

impl BVHBuildNode {
    fn interior(
        split_axis: usize,
        child0: Box<BVHBuildNode>,
        child1: Box<BVHBuildNode>,
    ) -> Box<Self> {
        Box::new(Self {
            bounds: child0.bounds.union_b(child1.bounds),
            content: BuildNodeContent::Interior {
                children: [child0, child1],
                split_axis,
            },
        })
    }

    fn leaf(first_triangle_index: usize, triangle_count: usize, bounds: Bounds3) -> Box<Self> {
        Box::new(Self {
            bounds,
            content: BuildNodeContent::Leaf {
                first_triangle_index,
                triangle_count,
            },
        })
    }
}
