//! Built-in game content: three haunted locations, one table each

use crate::{
    config::{Challenge, Difficulty, Level},
    sql::types::{Record, Value},
    storage::{Dataset, Table},
};

fn memoria(id: i64, nombre_persona: &str, tipo_registro: &str, detalle: &str) -> Record {
    [
        ("id", Value::Integer(id)),
        ("nombre_persona", nombre_persona.into()),
        ("tipo_registro", tipo_registro.into()),
        ("detalle", detalle.into()),
    ]
    .into_iter()
    .collect()
}

fn ilusion(id: i64, testimonio: &str, verdadero: bool, detalle: &str) -> Record {
    [
        ("id", Value::Integer(id)),
        ("testimonio", testimonio.into()),
        ("verdadero", verdadero.into()),
        ("detalle", detalle.into()),
    ]
    .into_iter()
    .collect()
}

fn muneca(id: i64, nombre_muneca: &str, energia: &str, descripcion: &str) -> Record {
    [
        ("id", Value::Integer(id)),
        ("nombre_muneca", nombre_muneca.into()),
        ("energia", energia.into()),
        ("descripcion", descripcion.into()),
    ]
    .into_iter()
    .collect()
}

pub fn dataset() -> Dataset {
    Dataset::new(vec![
        Table::new(
            "memorias_casa",
            vec![
                memoria(1, "Don Alfredo", "diario", "Maltrato físico a la niña"),
                memoria(2, "Doña Carmen", "testimonio", "Escuchó llantos en la noche"),
                memoria(3, "María Elena", "diario", "La niña tenía marcas extrañas"),
                memoria(4, "Padre José", "confesión", "Don Alfredo confesó sus pecados"),
                memoria(5, "Dr. Morales", "reporte", "Lesiones compatibles con abuso"),
                memoria(6, "Vecina Ana", "testimonio", "Vio la casa embrujada después"),
            ],
        ),
        Table::new(
            "ilusiones_xtabay",
            vec![
                ilusion(1, "Juan Pérez", false, "Fue seducido por la Xtabay"),
                ilusion(2, "Carlos López", true, "Logró resistir sus encantos"),
                ilusion(3, "Miguel Torres", false, "Perdió la razón por una noche"),
                ilusion(4, "Antonio Ruiz", true, "Reconoció las señales de peligro"),
                ilusion(5, "Rafael Santos", false, "Siguió la luz engañosa"),
                ilusion(6, "David Moreno", true, "Escapó antes del amanecer"),
            ],
        ),
        Table::new(
            "munecas_isla",
            vec![
                muneca(1, "Rosalinda", "oscura", "Cabeza rota, mirada fija"),
                muneca(2, "Esperanza", "neutral", "Vestido blanco, ojos cerrados"),
                muneca(3, "Dolores", "oscura", "Brazos amputados, sonrisa siniestra"),
                muneca(4, "Luz María", "neutral", "Cabello dorado, poses normal"),
                muneca(5, "Carmen", "oscura", "Ojos rojos, vestido rasgado"),
                muneca(6, "Ana Isabel", "neutral", "Muñeca de porcelana intacta"),
                muneca(7, "Guadalupe", "protectora", "Aureola dorada, manos juntas"),
            ],
        ),
    ])
}

fn challenge(
    id: u32,
    title: &str,
    description: &str,
    expected_query: &str,
    hints: [&str; 2],
    table: &str,
    difficulty: Difficulty,
) -> Challenge {
    Challenge {
        id,
        title: title.to_string(),
        description: description.to_string(),
        expected_query: expected_query.to_string(),
        hints: hints.iter().map(|h| h.to_string()).collect(),
        table: table.to_string(),
        difficulty,
    }
}

pub fn levels() -> Vec<Level> {
    vec![
        Level {
            id: 1,
            name: "La Casa de las Brujas".to_string(),
            scenario: "Una vieja casa colonial donde ocurrieron eventos traumáticos...".to_string(),
            description: "Investiga los registros de la casa para descubrir la verdad sobre lo que pasó con la niña.".to_string(),
            video_path: Some("/videos/casa_brujas.mp4".to_string()),
            image_path: Some("/images/casa_brujas.jpg".to_string()),
            challenges: vec![
                challenge(
                    1,
                    "Primeras Pistas",
                    "Muestra todos los registros de la tabla memorias_casa para comenzar la investigación.",
                    "SELECT * FROM memorias_casa",
                    [
                        "Usa SELECT para obtener datos de una tabla",
                        "El asterisco (*) significa 'todas las columnas'",
                    ],
                    "memorias_casa",
                    Difficulty::Easy,
                ),
                challenge(
                    2,
                    "Organizando las Evidencias",
                    "Ordena los registros por nombre de persona alfabéticamente para organizar las evidencias.",
                    "SELECT * FROM memorias_casa ORDER BY nombre_persona",
                    [
                        "Usa ORDER BY para ordenar los resultados",
                        "Especifica la columna por la cual quieres ordenar",
                    ],
                    "memorias_casa",
                    Difficulty::Easy,
                ),
            ],
        },
        Level {
            id: 2,
            name: "La Xtabay".to_string(),
            scenario: "En los bosques de Yucatán, una entidad seduce a los viajeros...".to_string(),
            description: "Analiza los testimonios para distinguir entre víctimas y sobrevivientes de la Xtabay.".to_string(),
            video_path: Some("/videos/xtabay.mp4".to_string()),
            image_path: Some("/images/xtabay.jpg".to_string()),
            challenges: vec![
                challenge(
                    3,
                    "Testimonios Verdaderos",
                    "Encuentra solo los testimonios verdaderos de quienes resistieron a la Xtabay.",
                    "SELECT * FROM ilusiones_xtabay WHERE verdadero = true",
                    [
                        "Usa WHERE para filtrar registros",
                        "El valor booleano 'true' indica testimonios verdaderos",
                    ],
                    "ilusiones_xtabay",
                    Difficulty::Medium,
                ),
                challenge(
                    4,
                    "Contando Víctimas",
                    "Agrupa los testimonios por su veracidad y cuenta cuántos hay de cada tipo.",
                    "SELECT verdadero, COUNT(*) as total FROM ilusiones_xtabay GROUP BY verdadero",
                    [
                        "Usa GROUP BY para agrupar registros",
                        "COUNT(*) cuenta el número de registros en cada grupo",
                    ],
                    "ilusiones_xtabay",
                    Difficulty::Medium,
                ),
            ],
        },
        Level {
            id: 3,
            name: "Isla de las Muñecas".to_string(),
            scenario: "Una isla misteriosa llena de muñecas colgadas de los árboles...".to_string(),
            description: "Investiga las energías de las muñecas para encontrar la protección contra las fuerzas oscuras.".to_string(),
            video_path: Some("/videos/isla_munecas.mp4".to_string()),
            image_path: Some("/images/isla_munecas.jpg".to_string()),
            challenges: vec![
                challenge(
                    5,
                    "Energías Malignas",
                    "Encuentra grupos de muñecas por tipo de energía que tengan más de 1 muñeca.",
                    "SELECT energia, COUNT(*) as cantidad FROM munecas_isla GROUP BY energia HAVING COUNT(*) > 1",
                    [
                        "Usa HAVING para filtrar grupos después de GROUP BY",
                        "HAVING funciona con funciones agregadas como COUNT()",
                    ],
                    "munecas_isla",
                    Difficulty::Hard,
                ),
                challenge(
                    6,
                    "La Protectora",
                    "Encuentra la muñeca protectora y combínala con sus características usando una consulta compleja.",
                    "SELECT m1.nombre_muneca, m1.energia, m1.descripcion FROM munecas_isla m1 INNER JOIN (SELECT energia FROM munecas_isla WHERE energia = 'protectora') m2 ON m1.energia = m2.energia",
                    [
                        "Usa INNER JOIN para combinar tablas",
                        "Puedes hacer un JOIN de una tabla consigo misma usando alias",
                    ],
                    "munecas_isla",
                    Difficulty::Hard,
                ),
            ],
        },
    ]
}
