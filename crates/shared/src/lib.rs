use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Идентификатор меш-данных (может разделяться несколькими объектами)
pub type MeshId = String;

fn default_true() -> bool {
    true
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_layers() -> u32 {
    1
}

/// Трансформация объекта (вращение в градусах, порядок XYZ)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Трансформация только со смещением
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

// ============================================================================
// Меш
// ============================================================================

/// Вершина меша
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    pub co: [f32; 3],
    #[serde(default)]
    pub no: [f32; 3],
    /// Выделена (в режиме редактирования перемещается вместе с курсором)
    #[serde(default)]
    pub select: bool,
    #[serde(default)]
    pub hide: bool,
}

impl MeshVertex {
    pub fn new(co: [f32; 3], no: [f32; 3]) -> Self {
        Self {
            co,
            no,
            select: false,
            hide: false,
        }
    }
}

/// Ребро меша (индексы двух вершин)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEdge {
    pub verts: [u32; 2],
    #[serde(default)]
    pub hide: bool,
}

impl MeshEdge {
    pub fn new(v1: u32, v2: u32) -> Self {
        Self {
            verts: [v1, v2],
            hide: false,
        }
    }
}

/// Полигон меша (выпуклый, вершины по кругу)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPoly {
    pub verts: Vec<u32>,
}

/// Геометрия меша: вершины, рёбра, полигоны
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<MeshVertex>,
    #[serde(default)]
    pub edges: Vec<MeshEdge>,
    #[serde(default)]
    pub polys: Vec<MeshPoly>,
    /// Для производной геометрии: индекс исходного ребра (None: ребро без оригинала).
    /// Если поле отсутствует, индексы совпадают.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_origin: Option<Vec<Option<u32>>>,
    /// Индекс исходного полигона для каждого полигона производной геометрии
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poly_origin: Option<Vec<Option<u32>>>,
}

/// Данные режима редактирования меша
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditMesh {
    /// Редактируемая топология (с флагами выделения и скрытия)
    pub mesh: MeshGeometry,
    /// Производная «клетка» для привязки (по умолчанию сама топология)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cage: Option<MeshGeometry>,
    /// Итоговая производная геометрия (по умолчанию клетка)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_mesh: Option<MeshGeometry>,
}

impl EditMesh {
    pub fn cage(&self) -> &MeshGeometry {
        self.cage.as_ref().unwrap_or(&self.mesh)
    }

    pub fn final_mesh(&self) -> &MeshGeometry {
        self.final_mesh.as_ref().unwrap_or_else(|| self.cage())
    }
}

/// Меш-данные: вычисленная геометрия и (опционально) режим редактирования
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Mesh {
    /// Вычисленная (с модификаторами) геометрия; None, если ещё не вычислена
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated: Option<MeshGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<EditMesh>,
}

// ============================================================================
// Арматура
// ============================================================================

/// Кость в режиме редактирования
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBone {
    pub name: String,
    pub head: [f32; 3],
    pub tail: [f32; 3],
    #[serde(default = "default_layers")]
    pub layer: u32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub head_selected: bool,
    #[serde(default)]
    pub tail_selected: bool,
}

/// Канал позы (кость в режиме позы)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseChannel {
    pub name: String,
    pub head: [f32; 3],
    pub tail: [f32; 3],
    /// Канал связан с костью арматуры
    #[serde(default = "default_true")]
    pub has_bone: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Скрыт через группу костей
    #[serde(default)]
    pub group_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    pub channels: Vec<PoseChannel>,
}

/// Арматура (скелет)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    /// Видимые слои костей (битовая маска)
    #[serde(default = "default_layers")]
    pub layers: u32,
    /// Кости режима редактирования (Some, если арматура редактируется)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_bones: Option<Vec<EditBone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
}

// ============================================================================
// Кривые
// ============================================================================

/// Тип рукоятки Безье
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandleType {
    #[default]
    Free,
    Auto,
    Vector,
    /// Рукоятка выровнена по противоположной и двигается вместе с ней
    Align,
}

/// Точка Безье: центр и две рукоятки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezTriple {
    pub handle_left: [f32; 3],
    pub center: [f32; 3],
    pub handle_right: [f32; 3],
    #[serde(default)]
    pub select_left: bool,
    #[serde(default)]
    pub select_center: bool,
    #[serde(default)]
    pub select_right: bool,
    #[serde(default)]
    pub hide: bool,
    #[serde(default)]
    pub handle_left_type: HandleType,
    #[serde(default)]
    pub handle_right_type: HandleType,
}

/// Контрольная точка полилинии/NURBS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BPoint {
    pub co: [f32; 3],
    #[serde(default)]
    pub select: bool,
    #[serde(default)]
    pub hide: bool,
}

/// Сплайн кривой
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "snake_case")]
pub enum Nurb {
    Bezier(Vec<BezTriple>),
    Poly(Vec<BPoint>),
}

impl Nurb {
    /// Количество точек сплайна
    pub fn len(&self) -> usize {
        match self {
            Nurb::Bezier(points) => points.len(),
            Nurb::Poly(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Кривая
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Curve {
    pub nurbs: Vec<Nurb>,
    /// Сплайны режима редактирования
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_nurbs: Option<Vec<Nurb>>,
}

// ============================================================================
// Камера и трекинг
// ============================================================================

/// Трек с восстановленной 3D-точкой (bundle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingTrack {
    pub name: String,
    /// Восстановленная позиция; None, если трек не реконструирован
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<[f32; 3]>,
}

/// Восстановленное положение камеры на кадре
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedCamera {
    pub frame: i32,
    pub transform: Transform,
}

/// Объект трекинга: сама камера или отслеживаемый внешний объект
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingObject {
    pub name: String,
    #[serde(default)]
    pub is_camera: bool,
    #[serde(default)]
    pub tracks: Vec<TrackingTrack>,
    #[serde(default)]
    pub reconstruction: Vec<ReconstructedCamera>,
}

/// Данные трекинга видеоклипа камеры
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MovieTracking {
    /// Исходная матрица камеры; None: используется трансформация объекта
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_transform: Option<Transform>,
    #[serde(default)]
    pub objects: Vec<TrackingObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CameraData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<MovieTracking>,
}

// ============================================================================
// Объекты сцены
// ============================================================================

/// Данные объекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectData {
    Mesh { mesh: MeshId },
    Armature(Armature),
    Curve(Curve),
    Empty,
    Camera(CameraData),
    /// Источник света: привязка не поддерживается
    Lamp,
}

/// Режим взаимодействия объекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectMode {
    #[default]
    Object,
    Edit,
    Pose,
    ParticleEdit,
}

/// Экземпляр, порождённый дубликатором
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DupliInstance {
    pub object: ObjectId,
    /// Трансформация относительно объекта-дубликатора
    pub transform: Transform,
}

/// Дубликатор: процедурно порождённые экземпляры других объектов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Duplicator {
    pub instances: Vec<DupliInstance>,
}

/// Объект сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    pub data: ObjectData,
    #[serde(default)]
    pub mode: ObjectMode,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    /// Был выделен до начала текущей операции
    #[serde(default)]
    pub was_selected: bool,
    /// Ожидает пересчёта (данные в кэше устарели)
    #[serde(default)]
    pub needs_recalc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicator: Option<Duplicator>,
}

impl SceneObject {
    pub fn new(id: &str, data: ObjectData) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            transform: Transform::new(),
            data,
            mode: ObjectMode::Object,
            visible: true,
            selected: false,
            was_selected: false,
            needs_recalc: false,
            duplicator: None,
        }
    }

    /// ID меш-данных, если объект является мешем
    pub fn mesh_id(&self) -> Option<&MeshId> {
        match &self.data {
            ObjectData::Mesh { mesh } => Some(mesh),
            _ => None,
        }
    }

    pub fn is_duplicator(&self) -> bool {
        self.duplicator.is_some()
    }
}

/// Сцена: упорядоченный список объектов и общие меш-данные
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub meshes: BTreeMap<MeshId, Mesh>,
    /// Активный объект
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<ObjectId>,
    /// Объект в режиме редактирования
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_object: Option<ObjectId>,
    /// Текущий кадр
    #[serde(default = "default_frame")]
    pub frame: i32,
}

fn default_frame() -> i32 {
    1
}

impl Scene {
    /// Найти объект по ID
    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn mesh(&self, id: &str) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn active_object(&self) -> Option<&SceneObject> {
        self.active.as_deref().and_then(|id| self.object(id))
    }

    pub fn edit_object(&self) -> Option<&SceneObject> {
        self.edit_object.as_deref().and_then(|id| self.object(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_json_defaults() {
        let json = r#"{
            "objects": [
                { "id": "e", "data": { "type": "empty" } },
                { "id": "m", "data": { "type": "mesh", "mesh": "grid" } }
            ],
            "meshes": { "grid": { "evaluated": { "vertices": [ { "co": [0, 0, 0] } ] } } }
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert!(scene.objects[0].visible);
        assert_eq!(scene.objects[0].transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(scene.frame, 1);
        assert_eq!(scene.objects[1].mesh_id().map(String::as_str), Some("grid"));
        let grid = scene.mesh("grid").unwrap();
        assert_eq!(grid.evaluated.as_ref().unwrap().vertices.len(), 1);
    }

    #[test]
    fn test_edit_mesh_fallbacks() {
        let mesh = MeshGeometry {
            vertices: vec![MeshVertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0])],
            ..Default::default()
        };
        let edit = EditMesh {
            mesh: mesh.clone(),
            cage: None,
            final_mesh: None,
        };
        assert_eq!(edit.cage(), &mesh);
        assert_eq!(edit.final_mesh(), &mesh);
    }

    #[test]
    fn test_nurb_roundtrip_tagging() {
        let nurb = Nurb::Poly(vec![BPoint {
            co: [0.0, 1.0, 2.0],
            select: false,
            hide: false,
        }]);
        let json = serde_json::to_string(&nurb).unwrap();
        assert!(json.contains("\"type\":\"poly\""));
        assert_eq!(serde_json::from_str::<Nurb>(&json).unwrap(), nurb);
    }
}
